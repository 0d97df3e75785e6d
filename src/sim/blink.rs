//! Hero blink animation
//!
//! Eyes close, stay shut briefly, then reopen. After each blink there is a
//! chance of a quick follow-up, up to three in a row. Advanced by frame `dt`
//! so it runs at the same speed at any refresh rate.

use rand::Rng;

const BLINK_MS: f32 = 400.0;
const CLOSING_MS: f32 = BLINK_MS / 4.0;
const CLOSED_MS: f32 = BLINK_MS / 6.0;
const OPENING_MS: f32 = BLINK_MS / 4.0;
/// Eyes stay open this long between blink sequences
const BETWEEN_BLINKS_MS: f32 = 4000.0;
/// First blink comes this soon after a reset
const FIRST_BLINK_MS: f32 = 1000.0;
const FOLLOW_UP_DELAY_MS: f32 = 150.0;
const MAX_BLINKS_IN_SEQUENCE: u8 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlinkState {
    Open,
    Closing,
    Closed,
    Opening,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Blink {
    pub state: BlinkState,
    /// Time spent in the current closing/closed/opening step
    timer: f32,
    /// Time the eyes have been fully open
    open_for: f32,
    /// Blinks so far in the current sequence
    sequence: u8,
    /// Countdown to a scheduled follow-up blink
    follow_up: Option<f32>,
}

impl Default for Blink {
    fn default() -> Self {
        Self {
            state: BlinkState::Open,
            timer: 0.0,
            open_for: BETWEEN_BLINKS_MS - FIRST_BLINK_MS,
            sequence: 0,
            follow_up: None,
        }
    }
}

impl Blink {
    fn begin(&mut self, sequence: u8) {
        self.state = BlinkState::Closing;
        self.timer = 0.0;
        self.sequence = sequence;
    }

    /// Chance of another blink right after the given blink in a sequence
    fn follow_up_chance(sequence: u8) -> f64 {
        match sequence {
            1 => 0.7,
            2 => 0.4,
            _ => 0.0,
        }
    }

    pub fn update<R: Rng + ?Sized>(&mut self, dt: f32, rng: &mut R) {
        match self.state {
            BlinkState::Open => {
                self.open_for += dt;
                if let Some(delay) = self.follow_up.as_mut() {
                    *delay -= dt;
                    if *delay <= 0.0 {
                        self.follow_up = None;
                        self.begin(self.sequence + 1);
                    }
                } else if self.open_for > BETWEEN_BLINKS_MS {
                    self.begin(1);
                }
            }
            BlinkState::Closing => {
                self.timer += dt;
                if self.timer >= CLOSING_MS {
                    self.state = BlinkState::Closed;
                    self.timer = 0.0;
                }
            }
            BlinkState::Closed => {
                self.timer += dt;
                if self.timer >= CLOSED_MS {
                    self.state = BlinkState::Opening;
                    self.timer = 0.0;
                }
            }
            BlinkState::Opening => {
                self.timer += dt;
                if self.timer >= OPENING_MS {
                    self.state = BlinkState::Open;
                    self.timer = 0.0;
                    self.open_for = 0.0;

                    let chance = Self::follow_up_chance(self.sequence);
                    if self.sequence < MAX_BLINKS_IN_SEQUENCE && rng.random_bool(chance) {
                        self.follow_up = Some(FOLLOW_UP_DELAY_MS);
                    } else {
                        self.sequence = 0;
                    }
                }
            }
        }
    }

    /// How far the eyelids are shut, 0 (open) to 1 (closed)
    pub fn closed_amount(&self) -> f32 {
        match self.state {
            BlinkState::Open => 0.0,
            BlinkState::Closing => (self.timer / CLOSING_MS).min(1.0),
            BlinkState::Closed => 1.0,
            BlinkState::Opening => 1.0 - (self.timer / OPENING_MS).min(1.0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn run(blink: &mut Blink, rng: &mut Pcg32, ms: f32) {
        let steps = (ms / 16.0) as usize;
        for _ in 0..steps {
            blink.update(16.0, rng);
        }
    }

    #[test]
    fn test_first_blink_after_a_second() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut blink = Blink::default();
        run(&mut blink, &mut rng, 960.0);
        assert_eq!(blink.state, BlinkState::Open);
        run(&mut blink, &mut rng, 64.0);
        assert_eq!(blink.state, BlinkState::Closing);
    }

    #[test]
    fn test_blink_cycle() {
        let mut rng = Pcg32::seed_from_u64(1);
        let mut blink = Blink::default();
        blink.begin(MAX_BLINKS_IN_SEQUENCE);
        blink.update(100.0, &mut rng);
        assert_eq!(blink.state, BlinkState::Closed);
        assert_eq!(blink.closed_amount(), 1.0);
        blink.update(70.0, &mut rng);
        assert_eq!(blink.state, BlinkState::Opening);
        blink.update(50.0, &mut rng);
        assert!((blink.closed_amount() - 0.5).abs() < 1e-6);
        blink.update(50.0, &mut rng);
        assert_eq!(blink.state, BlinkState::Open);
        // Third blink never schedules a follow-up
        assert_eq!(blink.follow_up, None);
        assert_eq!(blink.sequence, 0);
    }

    #[test]
    fn test_sequences_are_bounded() {
        let mut rng = Pcg32::seed_from_u64(99);
        let mut blink = Blink::default();
        for _ in 0..20_000 {
            blink.update(16.0, &mut rng);
            assert!(blink.sequence <= MAX_BLINKS_IN_SEQUENCE);
        }
    }
}
