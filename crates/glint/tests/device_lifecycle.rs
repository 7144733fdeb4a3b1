//! Whole-stack scenarios through the `Device` facade.

use std::thread;

use pretty_assertions::assert_eq;

use glint::cmd::{BlendFactor, BufferTarget, BufferUsageHint, TextureTarget, WrapAxis, WrapMode};
use glint::{
    BlendState, BufferHandle, Device, DeviceCaps, ResourceKind, TextureHandle, TextureUnit,
    TraceDevice,
};

#[test]
fn texture_dropped_off_thread_is_reclaimed_at_end_of_frame() {
    let mut device = Device::new(DeviceCaps::default());
    let mut dev = TraceDevice::new();
    let ctx = device.resource_context();

    let mut tex = TextureHandle::new(&mut dev, &ctx, TextureTarget::Tex2D);
    tex.storage(device.cache(), &mut dev, 64, 64, 4, 1).unwrap();
    tex.set_wrap(device.cache(), &mut dev, WrapAxis::S, WrapMode::Repeat);
    let tex_id = tex.id();

    device
        .cache()
        .apply_texture_units(
            &mut dev,
            0,
            &[Some(TextureUnit::new(TextureTarget::Tex2D, tex_id))],
        )
        .unwrap();

    // The owner's last reference goes away on a thread that is not allowed
    // to touch the device. The drop must only enqueue.
    thread::spawn(move || drop(tex)).join().unwrap();
    assert_eq!(device.live_count(ResourceKind::Texture), 1);

    // Tell the cache the id is going away, then drain on the device thread.
    device.cache().forget_resource(ResourceKind::Texture, tex_id);
    device.end_frame(&mut dev);
    assert_eq!(device.live_count(ResourceKind::Texture), 0);
    assert_eq!(device.live_bytes(ResourceKind::Texture), 0);
}

#[test]
fn frame_over_frame_state_reuse_is_free() {
    let mut device = Device::new(DeviceCaps::default());
    let mut dev = TraceDevice::new();
    let ctx = device.resource_context();

    let mut buf = BufferHandle::new(
        &mut dev,
        &ctx,
        BufferTarget::Array,
        BufferUsageHint::StaticDraw,
    );
    buf.allocate(device.cache(), &mut dev, 1024);

    let blend = BlendState {
        enabled: true,
        src: BlendFactor::SrcAlpha,
        dst: BlendFactor::OneMinusSrcAlpha,
    };
    device.cache().apply_blend(&mut dev, &blend);
    device.end_frame(&mut dev);
    dev.clear();

    // Frame two: identical desired state.
    device.cache().apply_blend(&mut dev, &blend);
    buf.allocate(device.cache(), &mut dev, 1024);
    device.end_frame(&mut dev);
    assert!(dev.commands().is_empty());

    buf.delete(device.cache(), &mut dev);
}

#[test]
fn context_reset_invalidates_mirrors_and_shared_surfaces() {
    let mut device = Device::new(DeviceCaps::default());
    let mut dev = TraceDevice::new();

    device.surfaces().acquire(&mut dev, 128, 128).unwrap();
    dev.clear();
    let blend = BlendState {
        enabled: true,
        src: BlendFactor::One,
        dst: BlendFactor::One,
    };
    device.cache().apply_blend(&mut dev, &blend);
    let first = dev.take_commands();

    device.handle_context_reset(&mut dev);
    assert!(device.surfaces().is_empty());

    dev.clear();
    device.cache().apply_blend(&mut dev, &blend);
    // Same value, but the mirror was reset: the full sequence goes out again.
    assert_eq!(dev.commands(), &first[..]);
}
