//! Text rendering of the presentation surfaces

use crate::session::Session;
use cadence_playback::{
    presentation::{ProgressBar, TrackList},
    PlayerEvent,
};
use std::fmt::Write;

/// Notification line for an event, if it deserves one
pub fn describe(event: &PlayerEvent) -> Option<String> {
    match event {
        PlayerEvent::TrackChanged { index, track } => Some(format!(
            "now playing {}. {} - {}",
            index + 1,
            track.title,
            track.artist
        )),
        PlayerEvent::PlaybackStateChanged { state, .. } => Some(format!("[{}]", state.as_str())),
        PlayerEvent::ShuffleChanged { enabled } => {
            Some(format!("shuffle {}", if *enabled { "on" } else { "off" }))
        }
        PlayerEvent::RepeatModeChanged { mode } => Some(format!("repeat {}", mode.as_str())),
        PlayerEvent::PlaybackRejected { track_id, reason } => Some(format!(
            "! playback failed ({}): {}",
            track_id.as_deref().unwrap_or("no track"),
            reason
        )),
        PlayerEvent::Progress { .. }
        | PlayerEvent::QueueLoaded { .. }
        | PlayerEvent::QueueReordered { .. }
        | PlayerEvent::VolumeChanged { .. } => None,
    }
}

/// `[#######-------] 1:05 / 3:20`
pub fn progress_line(progress: &ProgressBar, width: usize) -> String {
    let filled = ((progress.fraction * width as f64).round() as usize).min(width);
    format!(
        "[{}{}] {} / {}",
        "#".repeat(filled),
        "-".repeat(width - filled),
        progress.elapsed,
        progress.total
    )
}

/// Numbered track list with the active row marked
pub fn queue_listing(list: &TrackList) -> String {
    let mut out = list.count_label();
    for (row, track) in list.rows.iter().enumerate() {
        let marker = if list.is_active(row) { '>' } else { ' ' };
        let _ = write!(
            out,
            "\n{marker} {:>3}. {} - {}",
            row + 1,
            track.title,
            track.artist
        );
        if !track.duration_label.is_empty() {
            let _ = write!(out, " ({})", track.duration_label);
        }
    }
    out
}

/// Now playing, progress and control state
pub fn status(session: &Session) -> String {
    let controls = session.controls();
    let now_playing = session.now_playing();

    let title = if now_playing.title.is_empty() {
        "nothing selected".to_string()
    } else {
        format!("{} - {}", now_playing.title, now_playing.artist)
    };

    let mut out = format!("{} {}", controls.play_icon(), title);
    let _ = write!(
        out,
        "\n{}",
        progress_line(session.progress(), session.config().display.progress_width)
    );
    let _ = write!(
        out,
        "\nshuffle: {}  repeat: {}  volume: {:.0}%  state: {}",
        if controls.shuffle { "on" } else { "off" },
        controls.repeat.as_str(),
        session.volume_slider().width_percent(),
        session.player().state().as_str()
    );
    if !controls.enabled {
        out.push_str("\n(no tracks loaded)");
    }
    out
}

/// Everything to print after a command
pub fn report(session: &Session) -> String {
    let mut lines: Vec<String> = session.last_events().iter().filter_map(describe).collect();

    let queue_changed = session.last_events().iter().any(|event| {
        matches!(
            event,
            PlayerEvent::QueueLoaded { .. } | PlayerEvent::QueueReordered { .. }
        )
    });
    if queue_changed && session.config().display.show_queue {
        lines.push(queue_listing(session.track_list()));
    }

    lines.push(status(session));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence_playback::{presentation::TrackRow, PlaybackState, RepeatMode};

    fn row(id: &str, title: &str) -> TrackRow {
        TrackRow {
            id: id.to_string(),
            title: title.to_string(),
            artist: "Artist".to_string(),
            album: String::new(),
            duration_label: "3:00".to_string(),
            cover_url: String::new(),
        }
    }

    #[test]
    fn progress_line_fills_proportionally() {
        let progress = ProgressBar {
            fraction: 0.5,
            elapsed: "1:00".to_string(),
            total: "2:00".to_string(),
        };
        assert_eq!(progress_line(&progress, 10), "[#####-----] 1:00 / 2:00");
    }

    #[test]
    fn progress_line_never_overflows() {
        let progress = ProgressBar {
            fraction: 1.0,
            ..ProgressBar::default()
        };
        let line = progress_line(&progress, 4);
        assert!(line.starts_with("[####]"));
    }

    #[test]
    fn queue_listing_marks_active_row() {
        let list = TrackList {
            rows: vec![row("a", "First"), row("b", "Second")],
            active: Some(1),
        };

        let text = queue_listing(&list);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "2 tracks");
        assert!(lines[1].starts_with("    1. First"));
        assert!(lines[2].starts_with(">   2. Second"));
    }

    #[test]
    fn describe_skips_progress() {
        let progress = PlayerEvent::Progress {
            current_time: 1.0,
            duration: 2.0,
        };
        assert_eq!(describe(&progress), None);

        let state = PlayerEvent::PlaybackStateChanged {
            state: PlaybackState::Paused,
            is_playing: false,
        };
        assert_eq!(describe(&state).as_deref(), Some("[paused]"));

        let repeat = PlayerEvent::RepeatModeChanged {
            mode: RepeatMode::All,
        };
        assert_eq!(describe(&repeat).as_deref(), Some("repeat all"));
    }
}
