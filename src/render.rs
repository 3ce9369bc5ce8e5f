// SPDX-License-Identifier: GPL-3.0-only

//! Live composition path
//!
//! The playback adapter submits one raw frame per render tick; a worker runs
//! the pipeline off the caller's thread and hands transformed frames back in
//! submission order, tagged with a sequence number.
//!
//! Scheduling is latest-wins with a single request slot: a submission made
//! while a transform is in flight replaces any undisplayed pending request.
//! The in-flight result is still delivered (it may be shown once), and
//! exactly one fresh transform follows with the newest configuration, so a
//! parameter change is never silently lost. Consumers drop any result whose
//! sequence number is older than the newest one they have shown, so frames
//! cannot appear out of order.

use crate::config::PipelineConfig;
use crate::pipeline::{FilterBackend, FramePipeline};
use crate::preset::FilterPreset;
use image::RgbaImage;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::{mpsc, watch};
use tracing::{debug, warn};

/// One render tick's worth of input.
#[derive(Clone)]
pub struct RenderRequest {
    /// Raw frame for this tick (shared, never copied per submission)
    pub frame: Arc<RgbaImage>,
    /// Session configuration at submission time
    pub config: PipelineConfig,
    /// Live preset at submission time
    pub preset: FilterPreset,
}

/// A transformed frame ready for display.
pub struct RenderedFrame {
    /// Monotonically increasing submission sequence number
    pub seq: u64,
    pub image: RgbaImage,
}

/// Submission side of the live render path.
pub struct RenderQueue {
    slot: watch::Sender<Option<(u64, RenderRequest)>>,
    next_seq: AtomicU64,
    last_frame: Mutex<Option<Arc<RgbaImage>>>,
}

impl RenderQueue {
    /// Submit a frame for transformation, returning its sequence number.
    ///
    /// Replaces any pending, not-yet-started request (latest wins).
    pub fn submit(&self, request: RenderRequest) -> u64 {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut last) = self.last_frame.lock() {
            *last = Some(Arc::clone(&request.frame));
        }
        if self.slot.send(Some((seq, request))).is_err() {
            warn!("Render worker is gone, frame dropped");
        }
        seq
    }

    /// Re-render the most recently submitted frame under new parameters.
    ///
    /// This is the paused-playback path: a slider edit while the transport is
    /// stopped re-triggers exactly one transform of the last frame. Returns
    /// `None` when nothing has been submitted yet.
    pub fn resubmit_last(&self, config: PipelineConfig, preset: FilterPreset) -> Option<u64> {
        let frame = self.last_frame.lock().ok()?.clone()?;
        Some(self.submit(RenderRequest {
            frame,
            config,
            preset,
        }))
    }
}

/// Spawn the render worker on the current tokio runtime.
///
/// Returns the submission queue and the stream of transformed frames. The
/// worker runs each transform inside `spawn_blocking` so CPU-heavy filters
/// and inference never stall the async runtime; at most one transform is in
/// flight at a time.
pub fn spawn_render_worker<B>(
    pipeline: Arc<FramePipeline<B>>,
) -> (RenderQueue, mpsc::UnboundedReceiver<RenderedFrame>)
where
    B: FilterBackend + Send + Sync + 'static,
{
    let (slot_tx, mut slot_rx) = watch::channel::<Option<(u64, RenderRequest)>>(None);
    let (result_tx, result_rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        while slot_rx.changed().await.is_ok() {
            let taken = slot_rx.borrow_and_update().clone();
            let Some((seq, request)) = taken else {
                continue;
            };

            let pipeline = Arc::clone(&pipeline);
            let rendered = tokio::task::spawn_blocking(move || {
                pipeline.transform(&request.frame, &request.config, &request.preset)
            })
            .await;

            match rendered {
                Ok(image) => {
                    if result_tx.send(RenderedFrame { seq, image }).is_err() {
                        debug!("Result receiver dropped, stopping render worker");
                        break;
                    }
                }
                Err(e) => {
                    warn!(error = %e, "Render task failed, frame skipped");
                }
            }
        }
    });

    (
        RenderQueue {
            slot: slot_tx,
            next_seq: AtomicU64::new(0),
            last_frame: Mutex::new(None),
        },
        result_rx,
    )
}
