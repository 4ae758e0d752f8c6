use std::io::{self, Write};

/// Fire-and-forget sound cues emitted by the game loop.
///
/// Implementations must swallow their own failures; a cue never affects
/// game state.
pub trait AudioCues {
    fn on_food_eaten(&mut self);
    fn on_game_over(&mut self);
}

/// Plays no sound.
#[derive(Debug, Default, Clone, Copy)]
pub struct Muted;

impl AudioCues for Muted {
    fn on_food_eaten(&mut self) {}

    fn on_game_over(&mut self) {}
}

const BELL: &[u8] = b"\x07";

/// Rings the terminal bell: once for food, twice for game over.
#[derive(Debug)]
pub struct TerminalBell<W: Write> {
    out: W,
}

impl TerminalBell<io::Stdout> {
    /// Rings through its own `io::stdout()` handle, alongside the one the
    /// ratatui backend draws with. Both share the process-wide stdout lock
    /// and BEL moves no cursor, so frames are unaffected.
    #[must_use]
    pub fn stdout() -> Self {
        Self { out: io::stdout() }
    }
}

impl<W: Write> TerminalBell<W> {
    #[must_use]
    pub fn new(out: W) -> Self {
        Self { out }
    }

    fn ring(&mut self, times: usize) {
        let result = (0..times)
            .try_for_each(|_| self.out.write_all(BELL))
            .and_then(|()| self.out.flush());

        if let Err(error) = result {
            log::debug!("terminal bell failed: {error}");
        }
    }
}

impl<W: Write> AudioCues for TerminalBell<W> {
    fn on_food_eaten(&mut self) {
        self.ring(1);
    }

    fn on_game_over(&mut self) {
        self.ring(2);
    }
}

impl<A: AudioCues + ?Sized> AudioCues for Box<A> {
    fn on_food_eaten(&mut self) {
        (**self).on_food_eaten();
    }

    fn on_game_over(&mut self) {
        (**self).on_game_over();
    }
}
