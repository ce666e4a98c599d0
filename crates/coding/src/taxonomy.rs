//! The fixed eight-category coding taxonomy.
//!
//! The taxonomy is a closed enumeration: categories are never extended at
//! runtime, and any category string outside the set is rejected at the
//! parsing boundary. Each category carries a stable letter code, a
//! display title, a one-line definition (used verbatim in the
//! classification prompt), and a pastel highlight color.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// One of the eight fixed coding categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// A. Background & Context
    BackgroundContext,
    /// B. Feasibility & Practical Implementation
    Feasibility,
    /// C. Validity & Learning Assurance
    Validity,
    /// D. Disciplinary Relevance
    DisciplinaryRelevance,
    /// E. Student Engagement & Observations
    StudentEngagement,
    /// F. Reflection & Improvement
    Reflection,
    /// G. Sustainability & Future Use
    Sustainability,
    /// H. Additional Insights
    AdditionalInsights,
}

impl Category {
    /// All categories in A..H order.
    pub const ALL: [Category; 8] = [
        Category::BackgroundContext,
        Category::Feasibility,
        Category::Validity,
        Category::DisciplinaryRelevance,
        Category::StudentEngagement,
        Category::Reflection,
        Category::Sustainability,
        Category::AdditionalInsights,
    ];

    /// The single-letter code used in prompts and model responses.
    pub fn code(&self) -> &'static str {
        match self {
            Category::BackgroundContext => "A",
            Category::Feasibility => "B",
            Category::Validity => "C",
            Category::DisciplinaryRelevance => "D",
            Category::StudentEngagement => "E",
            Category::Reflection => "F",
            Category::Sustainability => "G",
            Category::AdditionalInsights => "H",
        }
    }

    /// Human-readable title.
    pub fn title(&self) -> &'static str {
        match self {
            Category::BackgroundContext => "Background & Context",
            Category::Feasibility => "Feasibility & Practical Implementation",
            Category::Validity => "Validity & Learning Assurance",
            Category::DisciplinaryRelevance => "Disciplinary Relevance",
            Category::StudentEngagement => "Student Engagement & Observations",
            Category::Reflection => "Reflection & Improvement",
            Category::Sustainability => "Sustainability & Future Use",
            Category::AdditionalInsights => "Additional Insights",
        }
    }

    /// One-line definition, included verbatim in the classification prompt.
    pub fn definition(&self) -> &'static str {
        match self {
            Category::BackgroundContext => {
                "Course structure and participant role including assessment format and delivery."
            }
            Category::Feasibility => {
                "Practical, logistical, and administrative aspects of implementing oral assessment."
            }
            Category::Validity => {
                "Evidence that the oral assessment measured intended learning outcomes."
            }
            Category::DisciplinaryRelevance => {
                "Fit between oral assessment and disciplinary norms, skills, and values."
            }
            Category::StudentEngagement => {
                "Student reactions, fairness, and inclusivity observations."
            }
            Category::Reflection => {
                "What worked, what did not, and what to change next time."
            }
            Category::Sustainability => {
                "Whether this approach can be maintained, scaled, or used long term."
            }
            Category::AdditionalInsights => {
                "Open reflections, emergent, or unanticipated themes."
            }
        }
    }

    /// Highlight fill color as an RRGGBB hex string (no leading '#').
    pub fn color(&self) -> &'static str {
        match self {
            Category::BackgroundContext => "FFF2CC",    // pastel yellow
            Category::Feasibility => "DAEEF3",          // pale aqua
            Category::Validity => "E2F0D9",             // mint
            Category::DisciplinaryRelevance => "FCE4D6", // blush peach
            Category::StudentEngagement => "E4DFEC",    // light lavender
            Category::Reflection => "D9E1F2",           // periwinkle
            Category::Sustainability => "F2F2F2",       // soft gray
            Category::AdditionalInsights => "D5E8D4",   // pastel green
        }
    }

    /// Parse a category from its letter code.
    ///
    /// Accepts surrounding whitespace and either case; anything outside
    /// the fixed set returns `None` (the caller drops the pair, it never
    /// raises).
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Some(Category::BackgroundContext),
            "B" => Some(Category::Feasibility),
            "C" => Some(Category::Validity),
            "D" => Some(Category::DisciplinaryRelevance),
            "E" => Some(Category::StudentEngagement),
            "F" => Some(Category::Reflection),
            "G" => Some(Category::Sustainability),
            "H" => Some(Category::AdditionalInsights),
            _ => None,
        }
    }

    /// Render the full taxonomy as prompt text, one category per line:
    /// `A. Background & Context – <definition>`.
    pub fn prompt_listing() -> String {
        let mut listing = String::new();
        for category in Category::ALL {
            listing.push_str(&format!(
                "{}. {} – {}\n",
                category.code(),
                category.title(),
                category.definition()
            ));
        }
        listing
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}. {}", self.code(), self.title())
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Category::parse(&s)
            .ok_or_else(|| D::Error::custom(format!("unknown coding category: {}", s)))
    }
}
