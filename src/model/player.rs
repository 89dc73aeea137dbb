//! Queue and transport controller
//!
//! Owns the playback queue, the current index, transport state, shuffle and
//! repeat settings, and the favorites list. Every mutation is published as a
//! [`PlayerSnapshot`] on a watch channel so the UI always renders the latest
//! state. Commands to the audio engine are fire-and-forget.
//!
//! The position shown to the user is driven by a simulated one-second clock
//! rather than by the engine. Only one clock task exists at a time; loading a
//! track replaces it.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use super::catalog::Song;
use super::playback::{PlaybackCommand, PlaybackSink, PlayerSnapshot, SongInfo, TransportState};
use super::types::RepeatMode;

pub const SEEK_STEP_MS: u64 = 10_000;
pub const TICK_MS: u64 = 1_000;

#[derive(Default)]
struct PlayerState {
    queue: Vec<SongInfo>,
    current_index: usize,
    current: Option<SongInfo>,
    transport: TransportState,
    shuffle: bool,
    repeat: RepeatMode,
    favorites: Vec<Song>,
}

impl PlayerState {
    fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            queue: self.queue.clone(),
            current_index: self.current_index,
            current: self.current.clone(),
            transport: self.transport.clone(),
            shuffle: self.shuffle,
            repeat: self.repeat,
            favorites: self.favorites.clone(),
        }
    }
}

struct Shared {
    state: Mutex<PlayerState>,
    snapshot_tx: watch::Sender<PlayerSnapshot>,
    sink: Arc<dyn PlaybackSink>,
    runtime: Option<Handle>,
    timer: Mutex<Option<JoinHandle<()>>>,
}

impl Drop for Shared {
    fn drop(&mut self) {
        let timer = self.timer.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = timer.take() {
            handle.abort();
        }
    }
}

/// Session-wide player. Cloning hands out another handle to the same player.
#[derive(Clone)]
pub struct PlayerController {
    shared: Arc<Shared>,
}

impl PlayerController {
    /// Create a player that drives `sink`. The position clock runs on the
    /// current tokio runtime; without one the clock only advances through
    /// explicit [`PlayerController::tick`] calls.
    pub fn new(sink: Arc<dyn PlaybackSink>) -> Self {
        let runtime = Handle::try_current().ok();
        if runtime.is_none() {
            tracing::warn!("No tokio runtime available, position clock disabled");
        }

        let (snapshot_tx, _) = watch::channel(PlayerSnapshot::default());

        Self {
            shared: Arc::new(Shared {
                state: Mutex::new(PlayerState::default()),
                snapshot_tx,
                sink,
                runtime,
                timer: Mutex::new(None),
            }),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<PlayerSnapshot> {
        self.shared.snapshot_tx.subscribe()
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        self.shared.snapshot_tx.borrow().clone()
    }

    fn lock(&self) -> MutexGuard<'_, PlayerState> {
        self.shared.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, state: &PlayerState) {
        self.shared.snapshot_tx.send_replace(state.snapshot());
    }

    fn send(&self, command: PlaybackCommand) {
        tracing::trace!(?command, "Playback command");
        self.shared.sink.send(command);
    }

    // ========================================================================
    // Queue
    // ========================================================================

    /// Replace the queue and start playing at `start_index` (clamped).
    /// An empty list leaves the player untouched.
    pub fn set_queue(&self, tracks: Vec<SongInfo>, start_index: usize) {
        let mut state = self.lock();
        self.set_queue_locked(&mut state, tracks, start_index);
        self.publish(&state);
    }

    fn set_queue_locked(&self, state: &mut PlayerState, tracks: Vec<SongInfo>, start_index: usize) {
        if tracks.is_empty() {
            tracing::debug!("Ignoring empty queue");
            return;
        }

        state.queue = tracks;
        state.current_index = start_index.min(state.queue.len() - 1);
        tracing::info!(len = state.queue.len(), index = state.current_index, "Queue replaced");

        let track = state.queue[state.current_index].clone();
        self.load(state, track);
    }

    /// Insert after the current entry without touching playback
    pub fn add_to_queue(&self, track: SongInfo) {
        let mut state = self.lock();
        let insert_at = if state.queue.is_empty() { 0 } else { state.current_index + 1 };
        tracing::debug!(title = %track.title, insert_at, "Adding to queue");
        state.queue.insert(insert_at, track);
        self.publish(&state);
    }

    /// Queue `track` to play right after the current one. Starts playback if
    /// nothing is queued.
    pub fn play_next_track(&self, track: SongInfo) {
        let mut state = self.lock();
        if state.queue.is_empty() {
            self.set_queue_locked(&mut state, vec![track], 0);
        } else {
            let insert_at = state.current_index + 1;
            tracing::debug!(title = %track.title, insert_at, "Playing next");
            state.queue.insert(insert_at, track);
        }
        self.publish(&state);
    }

    pub fn remove_from_queue(&self, index: usize) {
        let mut state = self.lock();
        if index >= state.queue.len() {
            return;
        }

        let removed = state.queue.remove(index);
        tracing::debug!(index, title = %removed.title, "Removed from queue");

        if index == state.current_index {
            if state.queue.is_empty() {
                self.reset(&mut state);
            } else if index < state.queue.len() {
                // The following entry slid into the current slot
                let track = state.queue[index].clone();
                self.load(&mut state, track);
            } else if state.repeat == RepeatMode::All {
                state.current_index = 0;
                let track = state.queue[0].clone();
                self.load(&mut state, track);
            } else {
                state.current_index = state.queue.len() - 1;
                let track = state.queue[state.current_index].clone();
                self.park(&mut state, track);
            }
        } else if index < state.current_index {
            state.current_index -= 1;
        }

        self.publish(&state);
    }

    pub fn clear_queue(&self) {
        let mut state = self.lock();
        self.reset(&mut state);
        self.publish(&state);
    }

    fn reset(&self, state: &mut PlayerState) {
        tracing::info!("Clearing queue");
        state.queue.clear();
        state.current_index = 0;
        state.current = None;
        state.transport = TransportState::default();
        self.send(PlaybackCommand::Stop);
    }

    /// Jump to an entry of the current queue
    pub fn play_queue_index(&self, index: usize) {
        let mut state = self.lock();
        let Some(track) = state.queue.get(index).cloned() else {
            return;
        };
        state.current_index = index;
        self.load(&mut state, track);
        self.publish(&state);
    }

    // ========================================================================
    // Transport
    // ========================================================================

    /// Load and play a single track. The queue is left as it is.
    pub fn play_track(&self, track: &SongInfo) {
        let mut state = self.lock();
        self.load(&mut state, track.clone());
        self.publish(&state);
    }

    fn load(&self, state: &mut PlayerState, track: SongInfo) {
        tracing::info!(title = %track.title, duration_ms = track.duration_ms, "Loading track");

        state.transport = TransportState {
            is_playing: true,
            position_ms: 0,
            duration_ms: track.duration_ms,
            current_title: Some(track.title.clone()),
            current_image_url: track.image_url.clone(),
        };
        self.send(PlaybackCommand::Load {
            url: track.url.clone(),
            title: track.title.clone(),
            image_url: track.image_url.clone(),
        });
        state.current = Some(track);

        self.restart_timer();
    }

    /// Load `track` into the engine paused at the start
    fn park(&self, state: &mut PlayerState, track: SongInfo) {
        self.load(state, track);
        state.transport.is_playing = false;
        self.send(PlaybackCommand::Pause);
    }

    pub fn toggle_play_pause(&self) {
        let mut state = self.lock();
        state.transport.is_playing = !state.transport.is_playing;
        tracing::debug!(is_playing = state.transport.is_playing, "Toggled playback");
        self.send(PlaybackCommand::Toggle);
        self.publish(&state);
    }

    pub fn play_next(&self) {
        let mut state = self.lock();
        self.advance(&mut state);
        self.publish(&state);
    }

    /// Only `RepeatMode::All` wraps; otherwise the last track stays loaded and
    /// playback stops.
    fn advance(&self, state: &mut PlayerState) {
        if state.queue.is_empty() {
            return;
        }

        if state.current_index + 1 < state.queue.len() {
            state.current_index += 1;
        } else if state.repeat == RepeatMode::All {
            state.current_index = 0;
        } else {
            tracing::debug!("End of queue reached");
            state.transport.is_playing = false;
            return;
        }

        let track = state.queue[state.current_index].clone();
        self.load(state, track);
    }

    /// Always wraps from the first entry to the last, whatever the repeat mode
    pub fn play_previous(&self) {
        let mut state = self.lock();
        if state.queue.is_empty() {
            return;
        }

        state.current_index = if state.current_index > 0 {
            state.current_index - 1
        } else {
            state.queue.len() - 1
        };

        let track = state.queue[state.current_index].clone();
        self.load(&mut state, track);
        self.publish(&state);
    }

    pub fn seek_forward(&self) {
        let mut state = self.lock();
        let transport = &mut state.transport;
        transport.position_ms = (transport.position_ms + SEEK_STEP_MS).min(transport.duration_ms);
        self.send(PlaybackCommand::SeekRelative(SEEK_STEP_MS as i64));
        self.publish(&state);
    }

    pub fn seek_backward(&self) {
        let mut state = self.lock();
        let transport = &mut state.transport;
        transport.position_ms = transport.position_ms.saturating_sub(SEEK_STEP_MS);
        self.send(PlaybackCommand::SeekRelative(-(SEEK_STEP_MS as i64)));
        self.publish(&state);
    }

    /// Absolute seek to `fraction` (0.0..=1.0) of the track. Does nothing
    /// while the duration is unknown.
    pub fn seek_to_fraction(&self, fraction: f32) {
        let mut state = self.lock();
        let duration = state.transport.duration_ms;
        if duration == 0 {
            return;
        }

        let position = (duration as f64 * fraction.clamp(0.0, 1.0) as f64) as u64;
        state.transport.position_ms = position;
        self.send(PlaybackCommand::SeekAbsolute(position));
        self.publish(&state);
    }

    /// The engine decoded the stream and knows its real length. Adopted only
    /// when the catalog did not report one.
    pub fn on_duration_discovered(&self, url: &str, duration_ms: u64) {
        let mut state = self.lock();
        let is_current = state.current.as_ref().is_some_and(|t| t.url == url);
        if !is_current || state.transport.duration_ms != 0 || duration_ms == 0 {
            return;
        }

        tracing::debug!(duration_ms, "Adopting decoded track duration");
        state.transport.duration_ms = duration_ms;
        if let Some(current) = state.current.as_mut() {
            current.duration_ms = duration_ms;
        }
        self.publish(&state);
    }

    // ========================================================================
    // Settings & favorites
    // ========================================================================

    pub fn toggle_shuffle(&self) {
        let mut state = self.lock();
        state.shuffle = !state.shuffle;
        self.publish(&state);
    }

    pub fn toggle_repeat_mode(&self) {
        let mut state = self.lock();
        state.repeat = state.repeat.next();
        tracing::debug!(repeat = ?state.repeat, "Repeat mode changed");
        self.publish(&state);
    }

    pub fn toggle_favorite(&self, song: &Song) {
        let mut state = self.lock();
        if let Some(pos) = state.favorites.iter().position(|s| s.id == song.id) {
            state.favorites.remove(pos);
            tracing::info!(song_id = %song.id, "Removed from favorites");
        } else {
            state.favorites.push(song.clone());
            tracing::info!(song_id = %song.id, "Added to favorites");
        }
        self.publish(&state);
    }

    pub fn is_favorite(&self, song_id: &str) -> bool {
        self.lock().favorites.iter().any(|s| s.id == song_id)
    }

    // ========================================================================
    // Position clock
    // ========================================================================

    /// Advance the simulated position by one tick
    pub fn tick(&self) {
        let mut state = self.lock();
        if !state.transport.is_playing {
            return;
        }

        let duration = state.transport.duration_ms;
        if duration == 0 {
            return;
        }

        let next_position = state.transport.position_ms + TICK_MS;
        if next_position < duration {
            state.transport.position_ms = next_position;
        } else {
            state.transport.position_ms = duration;
            if state.repeat == RepeatMode::One {
                if let Some(track) = state.current.clone() {
                    self.load(&mut state, track);
                }
            } else {
                self.advance(&mut state);
            }
        }

        self.publish(&state);
    }

    fn restart_timer(&self) {
        let Some(runtime) = &self.shared.runtime else {
            return;
        };

        let mut timer = self.shared.timer.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = timer.take() {
            previous.abort();
        }
        *timer = Some(runtime.spawn(run_position_clock(Arc::downgrade(&self.shared))));
    }
}

async fn run_position_clock(shared: Weak<Shared>) {
    let period = Duration::from_millis(TICK_MS);
    let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + period, period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        interval.tick().await;
        let Some(shared) = shared.upgrade() else {
            break;
        };
        PlayerController { shared }.tick();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingSink {
        commands: Mutex<Vec<PlaybackCommand>>,
    }

    impl RecordingSink {
        fn take(&self) -> Vec<PlaybackCommand> {
            std::mem::take(&mut *self.commands.lock().unwrap())
        }

        fn loads(&self) -> usize {
            self.commands
                .lock()
                .unwrap()
                .iter()
                .filter(|c| matches!(c, PlaybackCommand::Load { .. }))
                .count()
        }
    }

    impl PlaybackSink for RecordingSink {
        fn send(&self, command: PlaybackCommand) {
            self.commands.lock().unwrap().push(command);
        }
    }

    fn track(n: usize, duration_ms: u64) -> SongInfo {
        SongInfo {
            url: format!("https://cdn.example/{n}.mp4"),
            title: format!("Track {n}"),
            image_url: None,
            duration_ms,
            artist: Some("Artist".into()),
            track_id: Some(format!("id{n}")),
        }
    }

    fn tracks(count: usize) -> Vec<SongInfo> {
        (0..count).map(|n| track(n, 180_000)).collect()
    }

    fn new_player() -> (PlayerController, Arc<RecordingSink>) {
        let sink = Arc::new(RecordingSink::default());
        (PlayerController::new(sink.clone()), sink)
    }

    fn title(player: &PlayerController) -> Option<String> {
        player.snapshot().transport.current_title
    }

    #[test]
    fn set_queue_clamps_start_and_plays() {
        let (player, sink) = new_player();
        player.set_queue(tracks(3), 10);

        let snapshot = player.snapshot();
        assert_eq!(snapshot.current_index, 2);
        assert!(snapshot.transport.is_playing);
        assert_eq!(snapshot.transport.position_ms, 0);
        assert_eq!(snapshot.transport.duration_ms, 180_000);
        assert_eq!(
            sink.take(),
            vec![PlaybackCommand::Load {
                url: "https://cdn.example/2.mp4".into(),
                title: "Track 2".into(),
                image_url: None,
            }]
        );
    }

    #[test]
    fn empty_set_queue_changes_nothing() {
        let (player, sink) = new_player();
        player.set_queue(tracks(2), 1);
        sink.take();

        player.set_queue(Vec::new(), 0);
        let snapshot = player.snapshot();
        assert_eq!(snapshot.queue.len(), 2);
        assert_eq!(snapshot.current_index, 1);
        assert!(snapshot.transport.is_playing);
        assert!(sink.take().is_empty());
    }

    #[test]
    fn previous_always_wraps() {
        let (player, _) = new_player();
        player.set_queue(tracks(3), 1);

        player.play_previous();
        assert_eq!(player.snapshot().current_index, 0);
        player.play_previous();
        assert_eq!(player.snapshot().current_index, 2);
        player.play_previous();
        assert_eq!(player.snapshot().current_index, 1);
        assert_eq!(title(&player).as_deref(), Some("Track 1"));
    }

    #[test]
    fn next_stops_at_end_without_repeat() {
        let (player, sink) = new_player();
        player.set_queue(tracks(2), 0);
        player.play_next();
        assert_eq!(player.snapshot().current_index, 1);
        sink.take();

        player.play_next();
        let snapshot = player.snapshot();
        assert!(!snapshot.transport.is_playing);
        assert_eq!(snapshot.current_index, 1);
        assert_eq!(snapshot.transport.current_title.as_deref(), Some("Track 1"));
        assert!(sink.take().is_empty());
    }

    #[test]
    fn next_wraps_with_repeat_all() {
        let (player, _) = new_player();
        player.set_queue(tracks(2), 0);
        player.toggle_repeat_mode();
        player.play_next();

        player.play_next();
        let snapshot = player.snapshot();
        assert_eq!(snapshot.current_index, 0);
        assert!(snapshot.transport.is_playing);
        assert_eq!(snapshot.transport.current_title.as_deref(), Some("Track 0"));
    }

    #[test]
    fn navigation_on_empty_queue_is_noop() {
        let (player, sink) = new_player();
        player.play_next();
        player.play_previous();
        player.remove_from_queue(0);
        assert_eq!(player.snapshot(), PlayerSnapshot::default());
        assert!(sink.take().is_empty());
    }

    #[test]
    fn removing_only_entry_resets_transport() {
        let (player, sink) = new_player();
        player.set_queue(tracks(1), 0);
        sink.take();

        player.remove_from_queue(0);
        let snapshot = player.snapshot();
        assert!(snapshot.queue.is_empty());
        assert_eq!(snapshot.current_index, 0);
        assert_eq!(snapshot.transport, TransportState::default());
        assert!(snapshot.current.is_none());
        assert_eq!(sink.take(), vec![PlaybackCommand::Stop]);
    }

    #[test]
    fn removing_keeps_index_on_same_track() {
        let (player, sink) = new_player();
        player.set_queue(tracks(4), 2);
        sink.take();

        player.remove_from_queue(0);
        let snapshot = player.snapshot();
        assert_eq!(snapshot.current_index, 1);
        assert_eq!(snapshot.queue[1].title, "Track 2");

        player.remove_from_queue(2);
        assert_eq!(player.snapshot().current_index, 1);
        assert_eq!(player.snapshot().queue.len(), 2);

        player.remove_from_queue(7);
        assert_eq!(player.snapshot().queue.len(), 2);
        assert!(sink.take().is_empty());
    }

    #[test]
    fn removing_current_plays_following_entry() {
        let (player, _) = new_player();
        player.set_queue(tracks(3), 1);

        player.remove_from_queue(1);
        let snapshot = player.snapshot();
        assert_eq!(snapshot.current_index, 1);
        assert_eq!(snapshot.transport.current_title.as_deref(), Some("Track 2"));
        assert!(snapshot.transport.is_playing);
    }

    #[test]
    fn removing_current_last_entry_follows_repeat_mode() {
        let (player, sink) = new_player();
        player.set_queue(tracks(3), 2);
        sink.take();

        player.remove_from_queue(2);
        let snapshot = player.snapshot();
        assert_eq!(snapshot.current_index, 1);
        assert_eq!(snapshot.current.as_ref(), Some(&snapshot.queue[1]));
        assert_eq!(snapshot.transport.current_title.as_deref(), Some("Track 1"));
        assert_eq!(snapshot.transport.position_ms, 0);
        assert!(!snapshot.transport.is_playing);
        assert_eq!(
            sink.take(),
            vec![
                PlaybackCommand::Load {
                    url: "https://cdn.example/1.mp4".into(),
                    title: "Track 1".into(),
                    image_url: None,
                },
                PlaybackCommand::Pause,
            ]
        );

        let (player, _) = player_with_repeat_all();
        player.set_queue(tracks(3), 2);
        player.remove_from_queue(2);
        let snapshot = player.snapshot();
        assert_eq!(snapshot.current_index, 0);
        assert_eq!(snapshot.current.as_ref(), Some(&snapshot.queue[0]));
        assert_eq!(snapshot.transport.current_title.as_deref(), Some("Track 0"));
    }

    #[tokio::test(start_paused = true)]
    async fn parked_track_does_not_advance() {
        let (player, _) = new_player();
        player.set_queue(tracks(2), 1);
        player.remove_from_queue(1);

        tokio::time::sleep(Duration::from_millis(2_500)).await;
        let snapshot = player.snapshot();
        assert_eq!(snapshot.transport.position_ms, 0);
        assert!(!snapshot.transport.is_playing);

        player.toggle_play_pause();
        tokio::time::sleep(Duration::from_millis(1_000)).await;
        assert_eq!(player.snapshot().transport.position_ms, 1_000);
    }

    #[tokio::test(start_paused = true)]
    async fn play_track_leaves_queue_alone() {
        let (player, sink) = new_player();
        player.set_queue(tracks(3), 1);
        tokio::time::sleep(Duration::from_millis(2_500)).await;
        assert_eq!(player.snapshot().transport.position_ms, 2_000);
        sink.take();

        let single = track(7, 90_000);
        player.play_track(&single);
        let snapshot = player.snapshot();
        assert_eq!(snapshot.current, Some(single));
        assert_eq!(snapshot.transport.current_title.as_deref(), Some("Track 7"));
        assert_eq!(snapshot.transport.duration_ms, 90_000);
        assert_eq!(snapshot.transport.position_ms, 0);
        assert!(snapshot.transport.is_playing);
        assert_eq!(snapshot.queue, tracks(3));
        assert_eq!(snapshot.current_index, 1);
        assert_eq!(
            sink.take(),
            vec![PlaybackCommand::Load {
                url: "https://cdn.example/7.mp4".into(),
                title: "Track 7".into(),
                image_url: None,
            }]
        );

        // The clock restarts from the new load
        tokio::time::sleep(Duration::from_millis(700)).await;
        assert_eq!(player.snapshot().transport.position_ms, 0);
        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(player.snapshot().transport.position_ms, 1_000);
    }

    fn player_with_repeat_all() -> (PlayerController, Arc<RecordingSink>) {
        let (player, sink) = new_player();
        player.toggle_repeat_mode();
        (player, sink)
    }

    #[test]
    fn add_and_play_next_insert_after_current() {
        let (player, sink) = new_player();
        player.add_to_queue(track(9, 1000));
        let snapshot = player.snapshot();
        assert_eq!(snapshot.queue.len(), 1);
        assert!(!snapshot.transport.is_playing);
        assert!(sink.take().is_empty());

        player.set_queue(tracks(3), 1);
        player.add_to_queue(track(7, 1000));
        player.play_next_track(track(8, 1000));
        let titles: Vec<_> = player.snapshot().queue.iter().map(|t| t.title.clone()).collect();
        assert_eq!(titles, ["Track 0", "Track 1", "Track 8", "Track 7", "Track 2"]);
        assert_eq!(player.snapshot().current_index, 1);
    }

    #[test]
    fn play_next_track_on_empty_queue_starts_playback() {
        let (player, sink) = new_player();
        player.play_next_track(track(5, 1000));
        let snapshot = player.snapshot();
        assert_eq!(snapshot.queue.len(), 1);
        assert!(snapshot.transport.is_playing);
        assert_eq!(sink.loads(), 1);
    }

    #[test]
    fn clear_queue_stops_engine() {
        let (player, sink) = new_player();
        player.set_queue(tracks(3), 0);
        sink.take();

        player.clear_queue();
        assert_eq!(player.snapshot().transport, TransportState::default());
        assert_eq!(sink.take(), vec![PlaybackCommand::Stop]);
    }

    #[test]
    fn repeat_mode_cycles_through_all_states() {
        let (player, _) = new_player();
        let mut modes = Vec::new();
        for _ in 0..3 {
            player.toggle_repeat_mode();
            modes.push(player.snapshot().repeat);
        }
        assert_eq!(modes, [RepeatMode::All, RepeatMode::One, RepeatMode::None]);
    }

    #[test]
    fn shuffle_is_a_flag_only() {
        let (player, _) = new_player();
        player.set_queue(tracks(5), 0);
        let before = player.snapshot().queue;
        player.toggle_shuffle();
        assert!(player.snapshot().shuffle);
        assert_eq!(player.snapshot().queue, before);
        player.play_next();
        assert_eq!(player.snapshot().current_index, 1);
    }

    #[test]
    fn seek_to_fraction() {
        let (player, sink) = new_player();
        player.set_queue(vec![track(0, 100_000)], 0);
        sink.take();

        player.seek_to_fraction(0.5);
        assert_eq!(player.snapshot().transport.position_ms, 50_000);
        assert_eq!(sink.take(), vec![PlaybackCommand::SeekAbsolute(50_000)]);

        let (player, sink) = new_player();
        player.set_queue(vec![track(0, 0)], 0);
        sink.take();
        player.seek_to_fraction(0.5);
        assert_eq!(player.snapshot().transport.position_ms, 0);
        assert!(sink.take().is_empty());
    }

    #[test]
    fn relative_seeks_clamp_to_track() {
        let (player, sink) = new_player();
        player.set_queue(vec![track(0, 15_000)], 0);
        sink.take();

        player.seek_forward();
        assert_eq!(player.snapshot().transport.position_ms, 10_000);
        player.seek_forward();
        assert_eq!(player.snapshot().transport.position_ms, 15_000);
        player.seek_backward();
        assert_eq!(player.snapshot().transport.position_ms, 5_000);
        player.seek_backward();
        assert_eq!(player.snapshot().transport.position_ms, 0);

        assert_eq!(
            sink.take(),
            vec![
                PlaybackCommand::SeekRelative(10_000),
                PlaybackCommand::SeekRelative(10_000),
                PlaybackCommand::SeekRelative(-10_000),
                PlaybackCommand::SeekRelative(-10_000),
            ]
        );
    }

    #[test]
    fn toggle_play_pause_is_optimistic() {
        let (player, sink) = new_player();
        player.set_queue(tracks(1), 0);
        sink.take();

        player.toggle_play_pause();
        assert!(!player.snapshot().transport.is_playing);
        player.toggle_play_pause();
        assert!(player.snapshot().transport.is_playing);
        assert_eq!(sink.take(), vec![PlaybackCommand::Toggle, PlaybackCommand::Toggle]);
    }

    #[test]
    fn tick_with_repeat_one_restarts_track() {
        let (player, sink) = new_player();
        player.set_queue(vec![track(0, 3_000), track(1, 3_000)], 0);
        player.toggle_repeat_mode();
        player.toggle_repeat_mode();
        assert_eq!(player.snapshot().repeat, RepeatMode::One);

        player.tick();
        player.tick();
        assert_eq!(player.snapshot().transport.position_ms, 2_000);

        player.tick();
        let snapshot = player.snapshot();
        assert_eq!(snapshot.transport.position_ms, 0);
        assert!(snapshot.transport.is_playing);
        assert_eq!(snapshot.current_index, 0);
        assert_eq!(sink.loads(), 2);
    }

    #[test]
    fn tick_at_end_advances_queue() {
        let (player, _) = new_player();
        player.set_queue(vec![track(0, 2_000), track(1, 5_000)], 0);
        player.tick();
        player.tick();

        let snapshot = player.snapshot();
        assert_eq!(snapshot.current_index, 1);
        assert_eq!(snapshot.transport.position_ms, 0);
        assert_eq!(snapshot.transport.duration_ms, 5_000);
    }

    #[test]
    fn tick_at_end_of_queue_stops_on_last_track() {
        let (player, _) = new_player();
        player.set_queue(vec![track(0, 1_500)], 0);
        player.tick();
        player.tick();

        let snapshot = player.snapshot();
        assert!(!snapshot.transport.is_playing);
        assert_eq!(snapshot.transport.position_ms, 1_500);
    }

    #[test]
    fn tick_is_idle_while_paused_or_length_unknown() {
        let (player, _) = new_player();
        player.set_queue(vec![track(0, 0)], 0);
        player.tick();
        assert_eq!(player.snapshot().transport.position_ms, 0);

        player.on_duration_discovered("https://cdn.example/0.mp4", 4_000);
        player.tick();
        assert_eq!(player.snapshot().transport.position_ms, 1_000);

        player.toggle_play_pause();
        player.tick();
        assert_eq!(player.snapshot().transport.position_ms, 1_000);
    }

    #[test]
    fn discovered_duration_ignored_for_other_tracks() {
        let (player, _) = new_player();
        player.set_queue(vec![track(0, 0)], 0);
        player.on_duration_discovered("https://cdn.example/other.mp4", 4_000);
        assert_eq!(player.snapshot().transport.duration_ms, 0);

        player.set_queue(vec![track(1, 9_000)], 0);
        player.on_duration_discovered("https://cdn.example/1.mp4", 4_000);
        assert_eq!(player.snapshot().transport.duration_ms, 9_000);
    }

    #[test]
    fn favorites_toggle_by_id_in_insertion_order() {
        let (player, _) = new_player();
        let song = |id: &str| Song { id: id.into(), name: id.into(), ..Default::default() };

        player.toggle_favorite(&song("b"));
        player.toggle_favorite(&song("a"));
        player.toggle_favorite(&Song { name: "renamed".into(), ..song("b") });
        player.toggle_favorite(&song("c"));

        let ids: Vec<_> = player.snapshot().favorites.iter().map(|s| s.id.clone()).collect();
        assert_eq!(ids, ["a", "c"]);
        assert!(player.is_favorite("c"));
        assert!(!player.is_favorite("b"));
    }

    #[test]
    fn subscribers_see_latest_state() {
        let (player, _) = new_player();
        let mut rx = player.subscribe();
        player.set_queue(tracks(2), 1);
        assert!(rx.has_changed().unwrap());
        assert_eq!(rx.borrow_and_update().current_index, 1);
    }

    #[test]
    fn play_queue_index_jumps() {
        let (player, _) = new_player();
        player.set_queue(tracks(3), 0);
        player.play_queue_index(2);
        assert_eq!(title(&player).as_deref(), Some("Track 2"));
        player.play_queue_index(9);
        assert_eq!(player.snapshot().current_index, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn clock_advances_once_per_second() {
        let (player, _) = new_player();
        player.set_queue(vec![track(0, 60_000)], 0);

        tokio::time::sleep(Duration::from_millis(3_500)).await;
        assert_eq!(player.snapshot().transport.position_ms, 3_000);
    }

    #[tokio::test(start_paused = true)]
    async fn loading_a_track_replaces_the_clock() {
        let (player, _) = new_player();
        player.set_queue(tracks(2), 0);

        tokio::time::sleep(Duration::from_millis(1_500)).await;
        assert_eq!(player.snapshot().transport.position_ms, 1_000);

        player.play_next();
        tokio::time::sleep(Duration::from_millis(700)).await;
        assert_eq!(player.snapshot().transport.position_ms, 0);

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert_eq!(player.snapshot().transport.position_ms, 1_000);
    }
}
