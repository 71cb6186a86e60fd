//! Dashboard statistics: solve counts, streaks and the derived grade shown on the cards.

use serde::{Deserialize, Serialize};

/// Per-difficulty problem counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyCounts {
    pub easy: u32,
    pub medium: u32,
    pub hard: u32,
}

impl DifficultyCounts {
    pub fn total(&self) -> u32 {
        self.easy + self.medium + self.hard
    }
}

/// A user's practice statistics as delivered to the dashboard. Missing fields read as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardStats {
    pub solved_stats: DifficultyCounts,
    pub total_stats: DifficultyCounts,
    pub solved_count: u32,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_submissions: u32,
    pub successful_submissions: u32,
}

impl DashboardStats {
    /// Number of problems on the platform.
    pub fn total_problems(&self) -> u32 {
        self.total_stats.total()
    }

    /// Accepted submissions as a rounded percentage; `None` before the first submission.
    pub fn success_rate_percent(&self) -> Option<u32> {
        if self.total_submissions == 0 {
            return None;
        }
        let rate = f64::from(self.successful_submissions) / f64::from(self.total_submissions);
        Some((rate * 100.0).round() as u32)
    }

    pub fn streak_tier(&self) -> StreakTier {
        StreakTier::from_streak(self.current_streak)
    }

    pub fn grade(&self) -> PerformanceGrade {
        PerformanceGrade::from_counts(self.solved_count, self.total_submissions)
    }
}

/// How healthy the current daily streak is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StreakTier {
    Broken,
    Building,
    Good,
    Fire,
    Epic,
    Legendary,
}

impl StreakTier {
    pub fn from_streak(days: u32) -> Self {
        match days {
            0 => StreakTier::Broken,
            d if d >= 30 => StreakTier::Legendary,
            d if d >= 14 => StreakTier::Epic,
            d if d >= 7 => StreakTier::Fire,
            d if d >= 3 => StreakTier::Good,
            _ => StreakTier::Building,
        }
    }

    pub fn caption(&self) -> &'static str {
        match self {
            StreakTier::Broken => "Start coding!",
            StreakTier::Building => "Building momentum",
            StreakTier::Good => "Keep it up!",
            StreakTier::Fire => "On fire!",
            StreakTier::Epic => "Epic streak!",
            StreakTier::Legendary => "Legendary!",
        }
    }
}

/// Letter grade derived from solved problems per submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PerformanceGrade {
    #[serde(rename = "A+")]
    APlus,
    A,
    #[serde(rename = "B+")]
    BPlus,
    B,
    #[serde(rename = "C+")]
    CPlus,
    C,
    D,
}

impl PerformanceGrade {
    pub fn from_counts(solved: u32, total_submissions: u32) -> Self {
        let rate = if total_submissions > 0 {
            f64::from(solved) / f64::from(total_submissions) * 100.0
        } else {
            0.0
        };

        match rate {
            r if r >= 80.0 => PerformanceGrade::APlus,
            r if r >= 70.0 => PerformanceGrade::A,
            r if r >= 60.0 => PerformanceGrade::BPlus,
            r if r >= 50.0 => PerformanceGrade::B,
            r if r >= 40.0 => PerformanceGrade::CPlus,
            r if r >= 30.0 => PerformanceGrade::C,
            _ => PerformanceGrade::D,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PerformanceGrade::APlus => "A+",
            PerformanceGrade::A => "A",
            PerformanceGrade::BPlus => "B+",
            PerformanceGrade::B => "B",
            PerformanceGrade::CPlus => "C+",
            PerformanceGrade::C => "C",
            PerformanceGrade::D => "D",
        }
    }
}
