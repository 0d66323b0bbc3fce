//! Load a pose file and print what a host would show after loading.
//!
//! ```text
//! cargo run -p mimic-playback-core --example inspect -- fixtures/poses/bulk-with-gaps.json
//! ```

use std::fs;

use anyhow::{bail, Context, Result};
use mimic_playback_core::{Landmark, Landmark2D, PlaybackEvent, PosePlayer, RigFrame};

/// Stand-in solver: only reports how many landmarks were visible.
fn count_visible(landmarks: &[Landmark], _projected: &[Landmark2D]) -> Result<RigFrame> {
    if landmarks.iter().all(|lm| lm.visibility == 0.0) {
        bail!("no visible landmarks");
    }
    Ok(RigFrame::default())
}

fn main() -> Result<()> {
    let path = std::env::args()
        .nth(1)
        .context("usage: inspect <pose.json>")?;
    let raw = fs::read(&path).with_context(|| format!("failed to read {path}"))?;

    let mut player = PosePlayer::new(count_visible);
    let result = player.load_bytes(&raw);
    println!("status: {}", player.status());
    let summary = result.with_context(|| format!("failed to load {path}"))?;

    println!("fps: {}", summary.fps);
    println!("frames: {}", summary.frame_count);
    println!("duration: {}s", summary.duration_label());
    for event in player.take_events() {
        if let PlaybackEvent::Loaded {
            format,
            dropped_frames,
            ..
        } = event
        {
            println!("format: {format:?} ({dropped_frames} frames dropped)");
        }
    }
    Ok(())
}
