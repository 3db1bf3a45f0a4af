//! Frame scheduler adapter (one-shot "next display refresh" requests).

use crate::core::CanvasError;

/// Handle of an outstanding frame request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameRequest(pub i32);

pub trait FrameScheduler {
    /// Ask for one callback on the next refresh. The host then calls
    /// `Canvas::tick`.
    fn request_frame(&mut self) -> Result<FrameRequest, CanvasError>;

    fn cancel_frame(&mut self, request: FrameRequest);
}
