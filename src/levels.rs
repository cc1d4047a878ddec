//! Level parameter database
//!
//! Each level fixes how many pitches are thrown and the correct-call counts
//! needed for one, two and three stars. Levels are addressed 1-based, the
//! way the level select menu numbers them.

use serde::{Deserialize, Serialize};

/// Scoring parameters for one level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelParams {
    /// 1-based level number
    pub level: u32,
    pub pitch_amount: u32,
    pub correct_for_one_star: u32,
    pub correct_for_two_stars: u32,
    pub correct_for_three_stars: u32,
}

impl LevelParams {
    /// Star rating for a finished level: the highest satisfied threshold
    /// wins, so a count meeting two thresholds at once takes the higher star.
    pub fn stars_for(&self, correct_calls: u32) -> u32 {
        if correct_calls >= self.correct_for_three_stars {
            3
        } else if correct_calls >= self.correct_for_two_stars {
            2
        } else if correct_calls >= self.correct_for_one_star {
            1
        } else {
            0
        }
    }
}

/// Ordered set of playable levels
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelDatabase {
    pub levels: Vec<LevelParams>,
}

impl LevelDatabase {
    /// The standard ten-level ramp: longer levels with tighter thresholds
    pub fn standard() -> Self {
        let table = [
            // (pitches, one, two, three)
            (5, 3, 4, 5),
            (6, 3, 5, 6),
            (7, 4, 5, 7),
            (8, 4, 6, 8),
            (9, 5, 7, 9),
            (10, 6, 8, 10),
            (11, 7, 9, 11),
            (12, 8, 10, 12),
            (14, 9, 12, 14),
            (15, 10, 13, 15),
        ];
        let levels = table
            .iter()
            .enumerate()
            .map(|(i, &(pitch_amount, one, two, three))| LevelParams {
                level: i as u32 + 1,
                pitch_amount,
                correct_for_one_star: one,
                correct_for_two_stars: two,
                correct_for_three_stars: three,
            })
            .collect();
        Self { levels }
    }

    /// Look up a level by its 1-based number
    pub fn get(&self, level: u32) -> Option<&LevelParams> {
        if level == 0 {
            return None;
        }
        self.levels.get(level as usize - 1)
    }

    /// The level after `level`, if there is one
    pub fn next_after(&self, level: u32) -> Option<&LevelParams> {
        self.get(level + 1)
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }
}

impl Default for LevelDatabase {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params() -> LevelParams {
        LevelParams {
            level: 1,
            pitch_amount: 5,
            correct_for_one_star: 3,
            correct_for_two_stars: 4,
            correct_for_three_stars: 5,
        }
    }

    #[test]
    fn test_stars_thresholds() {
        let p = params();
        assert_eq!(p.stars_for(0), 0);
        assert_eq!(p.stars_for(2), 0);
        assert_eq!(p.stars_for(3), 1);
        assert_eq!(p.stars_for(4), 2);
        assert_eq!(p.stars_for(5), 3);
        assert_eq!(p.stars_for(6), 3);
    }

    #[test]
    fn test_tied_thresholds_favor_higher_star() {
        let p = LevelParams {
            level: 1,
            pitch_amount: 5,
            correct_for_one_star: 3,
            correct_for_two_stars: 5,
            correct_for_three_stars: 5,
        };
        // Meeting both the two- and three-star bars at once gives three.
        assert_eq!(p.stars_for(5), 3);
        assert_eq!(p.stars_for(4), 1);
    }

    #[test]
    fn test_standard_database_shape() {
        let db = LevelDatabase::standard();
        assert_eq!(db.len(), crate::consts::LEVEL_COUNT);

        for (i, p) in db.levels.iter().enumerate() {
            assert_eq!(p.level, i as u32 + 1);
            // Thresholds ascend and fit inside the pitch count.
            assert!(p.correct_for_one_star <= p.correct_for_two_stars);
            assert!(p.correct_for_two_stars <= p.correct_for_three_stars);
            assert!(p.correct_for_three_stars <= p.pitch_amount);
        }
    }

    #[test]
    fn test_lookup_is_one_based() {
        let db = LevelDatabase::standard();
        assert!(db.get(0).is_none());
        assert_eq!(db.get(1).unwrap().level, 1);
        assert_eq!(db.get(10).unwrap().level, 10);
        assert!(db.get(11).is_none());

        assert_eq!(db.next_after(1).unwrap().level, 2);
        assert!(db.next_after(10).is_none());
    }
}
