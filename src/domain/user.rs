//! User record - the persisted account, profile and progress document

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::Rank;

/// One entry of the append-only progress history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEntry {
    pub puzzle_id: String,
    pub correct: bool,
    pub timestamp: DateTime<Utc>,
}

/// An achievement held by a user, with catalog metadata copied at award time
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EarnedAchievement {
    pub id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub earned_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AvatarStyle {
    #[default]
    Circle,
    Square,
    Rounded,
}

/// Cosmetic profile plus the accumulated badge list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Profile {
    pub avatar_color: String,
    pub avatar_style: AvatarStyle,
    pub bio: String,
    pub nickname: Option<String>,
    /// Rank and achievement names, first award only
    pub badges: Vec<String>,
    pub skin_color: String,
    pub custom_avatar_emoji: String,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            avatar_color: "#3498db".to_string(),
            avatar_style: AvatarStyle::Circle,
            bio: String::new(),
            nickname: None,
            badges: Vec::new(),
            skin_color: "#FFD700".to_string(),
            custom_avatar_emoji: "🧙".to_string(),
        }
    }
}

/// Cosmetic profile changes requested by the player.
///
/// Badges are not part of this: they only ever grow through progression.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub avatar_color: Option<String>,
    pub avatar_style: Option<AvatarStyle>,
    pub bio: Option<String>,
    pub nickname: Option<String>,
    pub skin_color: Option<String>,
    pub custom_avatar_emoji: Option<String>,
}

impl ProfileUpdate {
    pub fn apply(self, profile: &mut Profile) {
        if let Some(color) = self.avatar_color {
            profile.avatar_color = color;
        }
        if let Some(style) = self.avatar_style {
            profile.avatar_style = style;
        }
        if let Some(bio) = self.bio {
            profile.bio = bio;
        }
        if let Some(nickname) = self.nickname {
            profile.nickname = Some(nickname);
        }
        if let Some(skin) = self.skin_color {
            profile.skin_color = skin;
        }
        if let Some(emoji) = self.custom_avatar_emoji {
            profile.custom_avatar_emoji = emoji;
        }
    }
}

/// Persisted user document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRecord {
    pub id: String,
    /// Trimmed and lower-cased
    pub email: String,
    pub password_hash: String,
    pub username: Option<String>,
    pub points: u64,
    pub rank: Rank,
    pub missions_completed: u32,
    pub correct_answers: u32,
    #[serde(default)]
    pub progress_history: Vec<ProgressEntry>,
    #[serde(default)]
    pub achievements: Vec<EarnedAchievement>,
    #[serde(default)]
    pub profile: Profile,
    /// Percentage of correct attempts, two decimal places
    pub average_accuracy: f64,
    #[serde(default)]
    pub streak_days: u32,
    /// Seconds
    #[serde(default)]
    pub total_game_time: u64,
    pub created_at: DateTime<Utc>,
    pub last_played_at: Option<DateTime<Utc>>,
}

impl UserRecord {
    /// Fresh account with zeroed counters and the default rank
    pub fn new(
        id: impl Into<String>,
        email: &str,
        password_hash: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: id.into(),
            email: normalize_email(email),
            password_hash: password_hash.into(),
            username: None,
            points: 0,
            rank: Rank::default(),
            missions_completed: 0,
            correct_answers: 0,
            progress_history: Vec::new(),
            achievements: Vec::new(),
            profile: Profile::default(),
            average_accuracy: 0.0,
            streak_days: 0,
            total_game_time: 0,
            created_at,
            last_played_at: None,
        }
    }

    pub fn holds_achievement(&self, id: &str) -> bool {
        self.achievements.iter().any(|a| a.id == id)
    }

    /// Add a badge unless already present. Returns true if it was added.
    pub fn add_badge(&mut self, badge: &str) -> bool {
        if self.profile.badges.iter().any(|b| b == badge) {
            return false;
        }
        self.profile.badges.push(badge.to_string());
        true
    }

    /// Recompute `average_accuracy` from the counters
    pub fn recompute_accuracy(&mut self) {
        self.average_accuracy = accuracy_percent(self.correct_answers, self.progress_history.len());
    }

    /// Name shown on leaderboards
    pub fn display_name(&self) -> &str {
        self.username
            .as_deref()
            .filter(|u| !u.trim().is_empty())
            .unwrap_or("Anonymous")
    }
}

/// `100 * correct / attempts`, rounded to two decimals; 0 with no attempts
pub fn accuracy_percent(correct: u32, attempts: usize) -> f64 {
    if attempts == 0 {
        return 0.0;
    }
    let raw = 100.0 * f64::from(correct) / attempts as f64;
    (raw * 100.0).round() / 100.0
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> UserRecord {
        UserRecord::new("u1", "  Player@Example.COM ", "hash", Utc::now())
    }

    #[test]
    fn test_new_user_is_zeroed() {
        let u = user();
        assert_eq!(u.email, "player@example.com");
        assert_eq!(u.points, 0);
        assert_eq!(u.rank, Rank::Villager);
        assert_eq!(u.average_accuracy, 0.0);
        assert!(u.progress_history.is_empty());
        assert!(u.profile.badges.is_empty());
        assert_eq!(u.display_name(), "Anonymous");
    }

    #[test]
    fn test_add_badge_suppresses_duplicates() {
        let mut u = user();
        assert!(u.add_badge("Knight"));
        assert!(!u.add_badge("Knight"));
        assert_eq!(u.profile.badges, vec!["Knight".to_string()]);
    }

    #[test]
    fn test_accuracy_percent() {
        assert_eq!(accuracy_percent(0, 0), 0.0);
        assert_eq!(accuracy_percent(1, 2), 50.0);
        assert_eq!(accuracy_percent(2, 3), 66.67);
        assert_eq!(accuracy_percent(5, 5), 100.0);
    }

    #[test]
    fn test_profile_update_keeps_badges() {
        let mut u = user();
        u.add_badge("First Steps");
        ProfileUpdate {
            bio: Some("hello".to_string()),
            avatar_style: Some(AvatarStyle::Square),
            ..Default::default()
        }
        .apply(&mut u.profile);

        assert_eq!(u.profile.bio, "hello");
        assert_eq!(u.profile.avatar_style, AvatarStyle::Square);
        assert_eq!(u.profile.avatar_color, "#3498db");
        assert_eq!(u.profile.badges, vec!["First Steps".to_string()]);
    }

    #[test]
    fn test_document_uses_camel_case() {
        let json = serde_json::to_value(user()).unwrap();
        assert!(json.get("missionsCompleted").is_some());
        assert!(json.get("averageAccuracy").is_some());
        assert_eq!(json["rank"], "Villager");
        assert_eq!(json["profile"]["avatarStyle"], "circle");
    }
}
