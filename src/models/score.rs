//! Set and match scores for best-of-three badminton matches.

use serde::{Deserialize, Serialize};

/// Points scored by each side in one set. A 0-0 set counts as not yet played,
/// so a genuinely drawn 0-0 set cannot be recorded.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct SetScore {
    pub a: u32,
    pub b: u32,
}

impl SetScore {
    pub fn new(a: u32, b: u32) -> Self {
        Self { a, b }
    }

    /// A set is played iff its recorded score is not 0-0.
    pub fn is_played(&self) -> bool {
        self.a > 0 || self.b > 0
    }

    /// Mutable access to one side's points.
    pub fn side_mut(&mut self, side: Side) -> &mut u32 {
        match side {
            Side::A => &mut self.a,
            Side::B => &mut self.b,
        }
    }
}

/// Full score of a match: exactly three sets, entered outright (not a running
/// log). All-zero sets mean the match has not started.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct MatchScore {
    pub set1: SetScore,
    pub set2: SetScore,
    pub set3: SetScore,
}

impl MatchScore {
    /// The three sets in order.
    pub fn sets(&self) -> [SetScore; 3] {
        [self.set1, self.set2, self.set3]
    }

    /// Mutable reference to one set.
    pub fn set_mut(&mut self, slot: SetSlot) -> &mut SetScore {
        match slot {
            SetSlot::First => &mut self.set1,
            SetSlot::Second => &mut self.set2,
            SetSlot::Third => &mut self.set3,
        }
    }

    /// Sets won by side A and side B, counting every set where one side
    /// outscored the other (unplayed 0-0 sets decide nothing).
    pub fn set_wins(&self) -> (u32, u32) {
        let mut a = 0;
        let mut b = 0;
        for set in self.sets() {
            if set.a > set.b {
                a += 1;
            }
            if set.b > set.a {
                b += 1;
            }
        }
        (a, b)
    }

    /// A match counts as played once its first set has points on it.
    pub fn is_played(&self) -> bool {
        self.set1.is_played()
    }
}

/// Which of the three sets a score edit targets.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SetSlot {
    First,
    Second,
    Third,
}

impl SetSlot {
    /// Parse an operator-facing set number (1, 2 or 3).
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(SetSlot::First),
            2 => Some(SetSlot::Second),
            3 => Some(SetSlot::Third),
            _ => None,
        }
    }

    pub fn number(self) -> u8 {
        match self {
            SetSlot::First => 1,
            SetSlot::Second => 2,
            SetSlot::Third => 3,
        }
    }
}

/// Which side of a match a score edit targets.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    A,
    B,
}
