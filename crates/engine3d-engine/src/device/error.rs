/// What the frame loop should do after failing to acquire a surface texture.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum SurfaceErrorAction {
    /// The surface (and depth buffer) were reconfigured; try again next frame.
    Reconfigured,
    /// Drop this frame only.
    SkipFrame,
    /// Unrecoverable (out of memory); the application should shut down.
    Fatal,
}
