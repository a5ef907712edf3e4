//! Playlist playback state machine.
//!
//! The original UI scattered playback state across component-local
//! variables; here it is an explicit finite state machine with pure
//! transition functions, independent of any rendering layer. Randomness is
//! injected so shuffle transitions are deterministic under test.
//!
//! Shuffle mode picks without replacement: a played set tracks which
//! tracks have been heard, and playback stops once it covers the whole
//! playlist.

use std::collections::HashSet;

use rand::Rng;

// ─── State ───────────────────────────────────────────────────────────────────

/// Where playback currently stands. Track positions are indices into the
/// playlist the machine was built over.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlaybackState {
  /// Nothing is playing.
  Idle,
  /// One track playing outside playlist mode; no auto-advance beyond it.
  Single { track: usize },
  /// Playlist mode, linear order.
  Sequential { current: usize },
  /// Playlist mode, random order without replacement. `history` is the
  /// order tracks were reached (last element is current); `played` is the
  /// no-replay set.
  Shuffle {
    history: Vec<usize>,
    played:  HashSet<usize>,
  },
}

impl PlaybackState {
  /// The index of the audible track, if any.
  pub fn current(&self) -> Option<usize> {
    match self {
      Self::Idle => None,
      Self::Single { track } => Some(*track),
      Self::Sequential { current } => Some(*current),
      Self::Shuffle { history, .. } => history.last().copied(),
    }
  }
}

// ─── Machine ─────────────────────────────────────────────────────────────────

/// Playback state for one playlist of `len` tracks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
  len:     usize,
  shuffle: bool,
  state:   PlaybackState,
}

impl Playlist {
  pub fn new(len: usize) -> Self {
    Self {
      len,
      shuffle: false,
      state: PlaybackState::Idle,
    }
  }

  pub fn state(&self) -> &PlaybackState {
    &self.state
  }

  pub fn shuffle_enabled(&self) -> bool {
    self.shuffle
  }

  /// The index of the audible track, if any.
  pub fn current(&self) -> Option<usize> {
    self.state.current()
  }

  /// Start playlist playback from the top (sequential) or from a
  /// uniformly random track (shuffle). No-op on an empty playlist.
  pub fn play_all<R: Rng>(&mut self, rng: &mut R) {
    if self.len == 0 {
      return;
    }
    self.state = if self.shuffle {
      let start = rng.gen_range(0..self.len);
      PlaybackState::Shuffle {
        history: vec![start],
        played:  HashSet::from([start]),
      }
    } else {
      PlaybackState::Sequential { current: 0 }
    };
  }

  /// Play one track outside playlist mode, replacing whatever was
  /// playing — at most one track is ever audible.
  pub fn play_single(&mut self, track: usize) {
    if track < self.len {
      self.state = PlaybackState::Single { track };
    }
  }

  /// End-of-track handoff. Sequential advances by one and stops past the
  /// end; shuffle advances to a random unplayed track and stops once the
  /// played set covers the playlist; a single track just stops.
  pub fn track_ended<R: Rng>(&mut self, rng: &mut R) {
    self.state = match std::mem::replace(&mut self.state, PlaybackState::Idle) {
      PlaybackState::Idle | PlaybackState::Single { .. } => PlaybackState::Idle,
      PlaybackState::Sequential { current } => {
        if current + 1 < self.len {
          PlaybackState::Sequential { current: current + 1 }
        } else {
          PlaybackState::Idle
        }
      }
      PlaybackState::Shuffle { mut history, mut played } => {
        match pick_unplayed(self.len, &played, rng) {
          Some(next) => {
            played.insert(next);
            history.push(next);
            PlaybackState::Shuffle { history, played }
          }
          None => PlaybackState::Idle,
        }
      }
    };
  }

  /// Manual skip forward. Sequential clamps at the last track; shuffle
  /// draws like [`Self::track_ended`] but stays put when every track has
  /// been played.
  pub fn next<R: Rng>(&mut self, rng: &mut R) {
    match &mut self.state {
      PlaybackState::Idle | PlaybackState::Single { .. } => {}
      PlaybackState::Sequential { current } => {
        if *current + 1 < self.len {
          *current += 1;
        }
      }
      PlaybackState::Shuffle { history, played } => {
        if let Some(next) = pick_unplayed(self.len, played, rng) {
          played.insert(next);
          history.push(next);
        }
      }
    }
  }

  /// Manual skip backward. Sequential clamps at the first track; shuffle
  /// steps back through its history, un-marking the abandoned track so it
  /// can be drawn again.
  pub fn previous(&mut self) {
    match &mut self.state {
      PlaybackState::Idle | PlaybackState::Single { .. } => {}
      PlaybackState::Sequential { current } => {
        *current = current.saturating_sub(1);
      }
      PlaybackState::Shuffle { history, played } => {
        if history.len() > 1 {
          let abandoned = history.pop().unwrap_or_default();
          played.remove(&abandoned);
        }
      }
    }
  }

  /// Flip shuffle. Toggling while in playlist mode resets playback.
  pub fn toggle_shuffle(&mut self) {
    self.shuffle = !self.shuffle;
    if matches!(
      self.state,
      PlaybackState::Sequential { .. } | PlaybackState::Shuffle { .. }
    ) {
      self.state = PlaybackState::Idle;
    }
  }
}

/// Uniform draw over `0..len` excluding `played`. `None` when exhausted.
fn pick_unplayed<R: Rng>(
  len: usize,
  played: &HashSet<usize>,
  rng: &mut R,
) -> Option<usize> {
  let remaining: Vec<usize> = (0..len).filter(|i| !played.contains(i)).collect();
  if remaining.is_empty() {
    None
  } else {
    Some(remaining[rng.gen_range(0..remaining.len())])
  }
}

// ─── Tests ───────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use rand::{SeedableRng, rngs::SmallRng};

  use super::*;

  fn rng(seed: u64) -> SmallRng {
    SmallRng::seed_from_u64(seed)
  }

  #[test]
  fn sequential_plays_in_order_and_stops() {
    let mut p = Playlist::new(3);
    let mut r = rng(0);
    p.play_all(&mut r);
    assert_eq!(p.current(), Some(0));
    p.track_ended(&mut r);
    assert_eq!(p.current(), Some(1));
    p.track_ended(&mut r);
    assert_eq!(p.current(), Some(2));
    p.track_ended(&mut r);
    assert_eq!(p.state(), &PlaybackState::Idle);
  }

  #[test]
  fn shuffle_visits_every_track_exactly_once() {
    // Driven entirely by end-of-track events, the played set must end up
    // covering all N tracks with no duplicates, for any seed.
    for seed in 0..32 {
      let mut p = Playlist::new(7);
      let mut r = rng(seed);
      p.toggle_shuffle();
      p.play_all(&mut r);

      let mut visited = Vec::new();
      while let Some(track) = p.current() {
        visited.push(track);
        p.track_ended(&mut r);
      }

      assert_eq!(visited.len(), 7, "seed {seed}: visited {visited:?}");
      let unique: HashSet<usize> = visited.iter().copied().collect();
      assert_eq!(unique.len(), 7, "seed {seed}: duplicates in {visited:?}");
      assert_eq!(p.state(), &PlaybackState::Idle);
    }
  }

  #[test]
  fn sequential_next_and_previous_clamp_at_bounds() {
    let mut p = Playlist::new(2);
    let mut r = rng(1);
    p.play_all(&mut r);
    p.previous();
    assert_eq!(p.current(), Some(0));
    p.next(&mut r);
    assert_eq!(p.current(), Some(1));
    p.next(&mut r);
    assert_eq!(p.current(), Some(1));
  }

  #[test]
  fn shuffle_previous_unmarks_the_abandoned_track() {
    let mut p = Playlist::new(4);
    let mut r = rng(2);
    p.toggle_shuffle();
    p.play_all(&mut r);
    p.next(&mut r);

    let abandoned = p.current().unwrap();
    p.previous();
    assert_ne!(p.current(), Some(abandoned));

    // The abandoned track is drawable again, so a full run still visits
    // all four tracks.
    let mut visited: HashSet<usize> = HashSet::new();
    while let Some(track) = p.current() {
      visited.insert(track);
      p.track_ended(&mut r);
    }
    assert_eq!(visited.len(), 4);
  }

  #[test]
  fn shuffle_previous_at_start_of_history_stays() {
    let mut p = Playlist::new(3);
    let mut r = rng(3);
    p.toggle_shuffle();
    p.play_all(&mut r);
    let first = p.current();
    p.previous();
    assert_eq!(p.current(), first);
  }

  #[test]
  fn shuffle_next_when_exhausted_stays_on_current() {
    let mut p = Playlist::new(1);
    let mut r = rng(4);
    p.toggle_shuffle();
    p.play_all(&mut r);
    assert_eq!(p.current(), Some(0));
    p.next(&mut r);
    assert_eq!(p.current(), Some(0));
  }

  #[test]
  fn toggling_shuffle_in_playlist_mode_resets_to_idle() {
    let mut p = Playlist::new(3);
    let mut r = rng(5);
    p.play_all(&mut r);
    assert!(p.current().is_some());
    p.toggle_shuffle();
    assert_eq!(p.state(), &PlaybackState::Idle);
    assert!(p.shuffle_enabled());
  }

  #[test]
  fn toggling_shuffle_while_single_keeps_playing() {
    let mut p = Playlist::new(3);
    p.play_single(1);
    p.toggle_shuffle();
    assert_eq!(p.current(), Some(1));
  }

  #[test]
  fn play_single_replaces_current_track() {
    let mut p = Playlist::new(3);
    p.play_single(0);
    p.play_single(2);
    assert_eq!(p.state(), &PlaybackState::Single { track: 2 });
    p.play_single(9);
    assert_eq!(p.current(), Some(2));
  }

  #[test]
  fn single_track_ending_goes_idle() {
    let mut p = Playlist::new(3);
    let mut r = rng(6);
    p.play_single(1);
    p.track_ended(&mut r);
    assert_eq!(p.state(), &PlaybackState::Idle);
  }

  #[test]
  fn empty_playlist_never_plays() {
    let mut p = Playlist::new(0);
    let mut r = rng(7);
    p.play_all(&mut r);
    assert_eq!(p.state(), &PlaybackState::Idle);
    p.toggle_shuffle();
    p.play_all(&mut r);
    assert_eq!(p.state(), &PlaybackState::Idle);
  }
}
