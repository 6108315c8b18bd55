//! Puzzle reference data and difficulty progression

use serde::{Deserialize, Serialize};

use super::Rank;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    /// Seconds allowed to answer
    pub fn time_limit_secs(&self) -> u32 {
        match self {
            Self::Easy => 60,
            Self::Medium => 50,
            Self::Hard => 40,
        }
    }

    /// Difficulties unlocked at a given rank
    pub fn for_rank(rank: Rank) -> &'static [Difficulty] {
        match rank {
            Rank::Villager => &[Self::Easy],
            Rank::Knight => &[Self::Easy, Self::Medium],
            Rank::Warrior => &[Self::Medium, Self::Hard],
            Rank::Champion | Rank::Legend => &[Self::Hard],
        }
    }
}

/// A puzzle including its answer key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Puzzle {
    pub id: u32,
    pub title: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub points: u64,
    /// Image URL shown to the player
    pub question: String,
    pub solution: i64,
}

/// Puzzle as sent to clients (no answer key)
#[derive(Debug, Clone, Serialize)]
pub struct PuzzleView<'a> {
    pub id: u32,
    pub title: &'a str,
    pub description: &'a str,
    pub difficulty: Difficulty,
    pub points: u64,
    pub question: &'a str,
}

impl Puzzle {
    pub fn view(&self) -> PuzzleView<'_> {
        PuzzleView {
            id: self.id,
            title: &self.title,
            description: &self.description,
            difficulty: self.difficulty,
            points: self.points,
            question: &self.question,
        }
    }

    pub fn is_correct(&self, answer: i64) -> bool {
        answer == self.solution
    }
}

/// Selection of puzzles for a rank, with the time limit that applies
#[derive(Debug, Clone)]
pub struct PuzzleAssignment<'a> {
    pub puzzle: &'a Puzzle,
    pub difficulties: &'static [Difficulty],
    pub time_limit_secs: u32,
}

/// Static puzzle catalog
#[derive(Debug, Clone)]
pub struct PuzzleCatalog {
    puzzles: Vec<Puzzle>,
}

impl PuzzleCatalog {
    pub fn new(puzzles: Vec<Puzzle>) -> Self {
        Self { puzzles }
    }

    /// The built-in Banana Quest puzzles
    pub fn builtin() -> Self {
        Self::new(vec![
            Puzzle {
                id: 1,
                title: "Banana Quest 1".to_string(),
                description: "Count the bananas in the image".to_string(),
                difficulty: Difficulty::Easy,
                points: 100,
                question: "https://www.sanfoh.com/uob/banana/data/te220a5ae4b48743784a1b79c2fn110.png".to_string(),
                solution: 0,
            },
            Puzzle {
                id: 2,
                title: "Banana Quest 2".to_string(),
                description: "Count the bananas in the image".to_string(),
                difficulty: Difficulty::Medium,
                points: 200,
                question: "https://www.sanfoh.com/uob/banana/data/tda960504e718609d6c2f28d7c2n54.png".to_string(),
                solution: 4,
            },
            Puzzle {
                id: 3,
                title: "Banana Quest 3".to_string(),
                description: "Count the bananas in the image".to_string(),
                difficulty: Difficulty::Easy,
                points: 100,
                question: "https://www.sanfoh.com/uob/banana/data/tde4a7bef40faff4194de5e6367n100.png".to_string(),
                solution: 0,
            },
        ])
    }

    pub fn get(&self, id: u32) -> Option<&Puzzle> {
        self.puzzles.iter().find(|p| p.id == id)
    }

    pub fn all(&self) -> &[Puzzle] {
        &self.puzzles
    }

    /// Puzzles eligible for a rank; falls back to every puzzle when none match
    pub fn eligible_for(&self, rank: Rank) -> Vec<&Puzzle> {
        let difficulties = Difficulty::for_rank(rank);
        let matching: Vec<&Puzzle> = self
            .puzzles
            .iter()
            .filter(|p| difficulties.contains(&p.difficulty))
            .collect();
        if matching.is_empty() {
            self.puzzles.iter().collect()
        } else {
            matching
        }
    }

    /// Pick the next puzzle for a rank. `pick` maps the number of candidates
    /// to the chosen index.
    pub fn assign(
        &self,
        rank: Rank,
        pick: impl FnOnce(usize) -> usize,
    ) -> Option<PuzzleAssignment<'_>> {
        let candidates = self.eligible_for(rank);
        if candidates.is_empty() {
            return None;
        }
        let index = pick(candidates.len()).min(candidates.len() - 1);
        let difficulties = Difficulty::for_rank(rank);
        let time_limit_secs = difficulties
            .iter()
            .max()
            .map(|d| d.time_limit_secs())
            .unwrap_or(Difficulty::Easy.time_limit_secs());

        Some(PuzzleAssignment {
            puzzle: candidates[index],
            difficulties,
            time_limit_secs,
        })
    }
}

impl Default for PuzzleCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_villager_gets_easy_puzzles() {
        let catalog = PuzzleCatalog::builtin();
        let eligible = catalog.eligible_for(Rank::Villager);
        assert_eq!(eligible.len(), 2);
        assert!(eligible.iter().all(|p| p.difficulty == Difficulty::Easy));
    }

    #[test]
    fn test_champion_falls_back_to_all_puzzles() {
        // No Hard puzzles in the builtin set
        let catalog = PuzzleCatalog::builtin();
        assert_eq!(catalog.eligible_for(Rank::Champion).len(), 3);
    }

    #[test]
    fn test_time_limit_follows_hardest_unlocked_difficulty() {
        let catalog = PuzzleCatalog::builtin();
        assert_eq!(catalog.assign(Rank::Villager, |_| 0).unwrap().time_limit_secs, 60);
        assert_eq!(catalog.assign(Rank::Knight, |_| 0).unwrap().time_limit_secs, 50);
        assert_eq!(catalog.assign(Rank::Warrior, |_| 0).unwrap().time_limit_secs, 40);
        assert_eq!(catalog.assign(Rank::Legend, |_| 0).unwrap().time_limit_secs, 40);
    }

    #[test]
    fn test_assign_clamps_out_of_range_pick() {
        let catalog = PuzzleCatalog::builtin();
        let assignment = catalog.assign(Rank::Knight, |n| n + 10).unwrap();
        assert_eq!(assignment.puzzle.id, 3);
    }

    #[test]
    fn test_view_hides_solution() {
        let catalog = PuzzleCatalog::builtin();
        let json = serde_json::to_value(catalog.get(2).unwrap().view()).unwrap();
        assert!(json.get("solution").is_none());
        assert_eq!(json["points"], 200);
        assert_eq!(json["difficulty"], "Medium");
    }

    #[test]
    fn test_empty_catalog_assigns_nothing() {
        let catalog = PuzzleCatalog::new(Vec::new());
        assert!(catalog.assign(Rank::Villager, |_| 0).is_none());
    }
}
