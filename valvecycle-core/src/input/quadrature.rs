//! Quadrature encoder decoding
//!
//! Decodes the two encoder phase signals into detent steps with a small
//! state machine, rejecting contact bounce that returns to the rest
//! position without completing a detent.

/// Decoder states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    CwStep1,
    CwStep2,
    CcwStep1,
    CcwStep2,
}

/// Quadrature decoder
///
/// Feed it every sample of the A/B lines; it reports +1 for a completed
/// clockwise detent and -1 for a counter-clockwise one.
#[derive(Debug, Clone)]
pub struct QuadratureDecoder {
    phase: Phase,
    last_a: bool,
    last_b: bool,
}

impl QuadratureDecoder {
    /// Create a decoder from the resting line levels
    pub fn new(a: bool, b: bool) -> Self {
        Self {
            phase: Phase::Idle,
            last_a: a,
            last_b: b,
        }
    }

    /// Process one sample of both lines
    ///
    /// Should be called frequently (every 1-2 ms).
    pub fn sample(&mut self, a: bool, b: bool) -> Option<i8> {
        if a == self.last_a && b == self.last_b {
            return None;
        }
        self.last_a = a;
        self.last_b = b;
        self.decode(a, b)
    }

    /// CW:  A leads B. Idle (1,1) -> (0,1) -> (0,0) -> detent on release
    /// CCW: B leads A. Idle (1,1) -> (1,0) -> (0,0) -> detent on release
    fn decode(&mut self, a: bool, b: bool) -> Option<i8> {
        match self.phase {
            Phase::Idle => {
                if !a && b {
                    self.phase = Phase::CwStep1;
                } else if a && !b {
                    self.phase = Phase::CcwStep1;
                }
                None
            }
            Phase::CwStep1 => {
                if !a && !b {
                    self.phase = Phase::CwStep2;
                } else if a && b {
                    self.phase = Phase::Idle;
                }
                None
            }
            Phase::CwStep2 => {
                if a || b {
                    self.phase = Phase::Idle;
                    return Some(1);
                }
                None
            }
            Phase::CcwStep1 => {
                if !a && !b {
                    self.phase = Phase::CcwStep2;
                } else if a && b {
                    self.phase = Phase::Idle;
                }
                None
            }
            Phase::CcwStep2 => {
                if a || b {
                    self.phase = Phase::Idle;
                    return Some(-1);
                }
                None
            }
        }
    }
}
