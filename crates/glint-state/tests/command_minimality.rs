//! Cross-slot properties: select minimality, idempotence over a whole
//! frame's worth of state, invalidation, and sequence determinism.

use std::sync::Arc;

use pretty_assertions::assert_eq;

use glint_device::cmd::{BlendFactor, CompareFunc, MatrixMode, TextureTarget};
use glint_device::{Command, DeviceCaps, RenderStats, TraceDevice};
use glint_state::{BlendState, DepthState, Light, StateCache, TextureUnit};

fn cache_pair() -> (TraceDevice, StateCache, Arc<RenderStats>) {
    let stats = Arc::new(RenderStats::new());
    let cache = StateCache::new(&DeviceCaps::default(), Arc::clone(&stats));
    (TraceDevice::new(), cache, stats)
}

fn apply_typical_frame(cache: &mut StateCache, dev: &mut TraceDevice) {
    cache.apply_blend(
        dev,
        &BlendState {
            enabled: true,
            src: BlendFactor::SrcAlpha,
            dst: BlendFactor::OneMinusSrcAlpha,
        },
    );
    cache.apply_depth(
        dev,
        &DepthState {
            func: CompareFunc::LessOrEqual,
            write: true,
        },
    );
    cache
        .apply_texture_units(
            dev,
            0,
            &[
                Some(TextureUnit::new(TextureTarget::Tex2D, 1)),
                Some(TextureUnit::new(TextureTarget::Tex2D, 2)),
            ],
        )
        .unwrap();
    cache
        .apply_lights(dev, 0, &[Some(Light::default())])
        .unwrap();
    let mut mv = [0.0f32; 16];
    for i in 0..4 {
        mv[i * 5] = 1.0;
    }
    cache.apply_transform(dev, MatrixMode::ModelView, &mv);
}

#[test]
fn reapplying_a_whole_frame_is_silent() {
    let (mut dev, mut cache, _) = cache_pair();
    apply_typical_frame(&mut cache, &mut dev);
    dev.clear();

    apply_typical_frame(&mut cache, &mut dev);
    assert!(dev.commands().is_empty());
}

#[test]
fn identical_desired_state_yields_identical_sequences() {
    let (mut dev_a, mut cache_a, _) = cache_pair();
    let (mut dev_b, mut cache_b, _) = cache_pair();

    apply_typical_frame(&mut cache_a, &mut dev_a);
    apply_typical_frame(&mut cache_b, &mut dev_b);

    assert_eq!(dev_a.commands(), dev_b.commands());
}

#[test]
fn unit_selects_track_required_mode_changes_not_call_count() {
    let (mut dev, mut cache, stats) = cache_pair();
    let unit = |id| Some(TextureUnit::new(TextureTarget::Tex2D, id));

    cache.apply_texture_units(&mut dev, 0, &[unit(1)]).unwrap();
    // Ten more applies, none of which need the device to change modes.
    for _ in 0..10 {
        cache.apply_texture_units(&mut dev, 0, &[unit(1)]).unwrap();
    }
    let selects = dev
        .commands()
        .iter()
        .filter(|c| matches!(c, Command::SelectTextureUnit(_)))
        .count();
    assert_eq!(selects, 1);
    assert_eq!(stats.frame().mode_switches, 1);
}

#[test]
fn invalidate_all_forces_full_reapplication() {
    let (mut dev, mut cache, _) = cache_pair();
    apply_typical_frame(&mut cache, &mut dev);
    let first = dev.take_commands();
    assert!(!first.is_empty());

    cache.invalidate_all();
    apply_typical_frame(&mut cache, &mut dev);
    let second = dev.take_commands();
    // Everything goes out again, and in the same deterministic order.
    assert_eq!(first, second);
}

#[test]
fn frame_counters_reflect_cache_activity() {
    let (mut dev, mut cache, stats) = cache_pair();
    apply_typical_frame(&mut cache, &mut dev);
    let frame = stats.frame();
    assert!(frame.state_changes > 0);
    assert_eq!(frame.texture_binds, 2);

    stats.reset_frame();
    apply_typical_frame(&mut cache, &mut dev);
    assert_eq!(stats.frame().state_changes, 0);
}
