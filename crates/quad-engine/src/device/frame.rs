/// Represents a single acquired back-buffer.
///
/// This object is short-lived and must be finalized promptly. Holding the surface
/// texture prevents acquisition of subsequent frames.
pub struct WgpuDrawable {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
}

impl WgpuDrawable {
    /// Schedules the texture for presentation.
    ///
    /// Must be called after the work targeting it has been submitted.
    pub fn present(self) {
        drop(self.view);
        self.surface_texture.present();
    }
}
