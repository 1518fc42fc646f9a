//! Static level descriptors and the built-in case catalog.

use serde::Serialize;

/// Levels that never need unlocking: the tutorial and the first case.
pub const ALWAYS_UNLOCKED: [u32; 2] = [0, 1];

/// Intro shown in the menu's case file.
pub const CASE_INTRO: &str = "John Doe was shot from a rooftop in the middle of the city. \
The department has assembled a knowledge graph of everyone and everything connected to the case. \
Query it, follow each lead and narrow the list of suspects until only the killer remains.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Level {
    pub number: u32,
    pub title: String,
    pub lead: String,
    pub hint: Option<String>,
    pub answer: Option<String>,
    /// Canonical query whose result set defines the correct answer.
    pub ground_truth_query: String,
}

impl Level {
    pub fn new(
        number: u32,
        title: impl Into<String>,
        lead: impl Into<String>,
        ground_truth_query: impl Into<String>,
    ) -> Self {
        Self {
            number,
            title: title.into(),
            lead: lead.into(),
            hint: None,
            answer: None,
            ground_truth_query: ground_truth_query.into(),
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn with_answer(mut self, answer: impl Into<String>) -> Self {
        self.answer = Some(answer.into());
        self
    }

    pub fn is_tutorial(&self) -> bool {
        self.number == 0
    }

    /// Name of the boolean property that marks a restricted node as part of this level's graph.
    pub fn visibility_flag(&self) -> String {
        visibility_flag(self.number)
    }
}

/// `graph_{n-1}` for level `n`, with the tutorial sharing `graph_0`.
pub fn visibility_flag(level: u32) -> String {
    format!("{}{}", crate::INTERNAL_PROPERTY_PREFIX, level.saturating_sub(1))
}

/// Ordered, immutable collection of levels, built once and shared by reference.
#[derive(Debug, Clone, Default)]
pub struct LevelCatalog {
    levels: Vec<Level>,
}

impl LevelCatalog {
    /// Levels are kept sorted by number.
    pub fn new(mut levels: Vec<Level>) -> Self {
        levels.sort_by_key(|level| level.number);
        levels.dedup_by_key(|level| level.number);
        Self { levels }
    }

    pub fn builtin() -> Self {
        Self::new(builtin_levels())
    }

    pub fn get(&self, number: u32) -> Option<&Level> {
        self.levels
            .binary_search_by_key(&number, |level| level.number)
            .ok()
            .map(|index| &self.levels[index])
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Level> {
        self.levels.iter()
    }

    pub fn first(&self) -> Option<&Level> {
        self.levels.first()
    }

    pub fn last(&self) -> Option<&Level> {
        self.levels.last()
    }

    pub fn next_after(&self, number: u32) -> Option<&Level> {
        self.levels.iter().find(|level| level.number > number)
    }
}

const SUSPECT_NAMES: &str = "RETURN s.name AS suspect";

fn suspects_where(condition: &str) -> String {
    format!("MATCH (s:Suspect) WHERE {condition} {SUSPECT_NAMES}")
}

fn builtin_levels() -> Vec<Level> {
    let level_0 = format!("MATCH (s:Suspect) {SUSPECT_NAMES}");
    let level_1 = suspects_where("s.verified_alibi = false");
    let level_2 = format!(
        "MATCH (s:Suspect)-[:WAS_AT]->(:Location {{name: \"Grandview Hotel\"}}) {SUSPECT_NAMES}"
    );
    let level_3 = format!(
        "MATCH (s:Suspect)-[:WORKS_AT]->(:Location {{name: \"Grandview Hotel\"}}) {SUSPECT_NAMES}"
    );
    let level_4 = suspects_where("s.access_level >= 2");
    let level_5 = suspects_where("s.hair = \"brown\" AND s.height >= 6.0");
    let level_6 = suspects_where("s.blood_type = \"O+\"");
    let level_7 = format!(
        "MATCH (:Victim {{name: \"John Doe\"}})<-[:CLOSE_FRIEND_OF]-(s:Suspect) {SUSPECT_NAMES}"
    );
    let level_8 = format!(
        "MATCH (s:Suspect)-[r:DEPOSITED_IN]->(:Bank) WITH s, SUM(r.amount) AS total \
         WHERE total = 475500 {SUSPECT_NAMES}"
    );

    vec![
        Level::new(
            0,
            "Tutorial",
            "Welcome to Cypher Detective. This tutorial helps you get started. Query the knowledge \
             graph to find the names of all suspects. In this level and every level after it, \
             return the suspects' names as 'suspect' (e.g. RETURN s.name AS suspect).",
            level_0.clone(),
        )
        .with_hint("Use MATCH to find every node with the Suspect label, then RETURN their names.")
        .with_answer(level_0),
        Level::new(
            1,
            "Alibis",
            "Early investigation into the homicide of John Doe has confirmed the alibis of some \
             suspects. Those suspects are marked with 'verified_alibi = true'. Find the names of \
             only the suspects who DON'T have a verified alibi.",
            level_1.clone(),
        )
        .with_hint(
            "Match the suspects whose verified_alibi property is false and return their names as \
             'suspect'.",
        )
        .with_answer(level_1),
        Level::new(
            2,
            "The Bullet's Path",
            "The bullet was fired from the rooftop of the Grandview Hotel, so only people who were \
             at the hotel remain suspects. Find the names of all suspects who were at the \
             Grandview Hotel.",
            level_2.clone(),
        )
        .with_hint("Follow WAS_AT relationships from suspects to the Grandview Hotel.")
        .with_answer(level_2),
        Level::new(
            3,
            "Hotel Employees",
            "The rooftop door of the Grandview Hotel is always locked and only employees can open \
             it. Find the names of all suspects who work at the Grandview Hotel.",
            level_3.clone(),
        )
        .with_hint("Follow WORKS_AT relationships from suspects to the Grandview Hotel.")
        .with_answer(level_3),
        Level::new(
            4,
            "Keycard Access",
            "Hotel staff told us that only employees with security access level 2 or higher can \
             get a keycard for the rooftop door. Find the names of all suspects with access level \
             2 or higher.",
            level_4.clone(),
        )
        .with_hint("Filter suspects on access_level >= 2.")
        .with_answer(level_4),
        Level::new(
            5,
            "The Witness",
            "A witness saw someone climb the stairs towards the rooftop: brown hair and at least 6 \
             feet tall. Find the names of all suspects matching this description.",
            level_5.clone(),
        )
        .with_hint("Combine hair = 'brown' AND height >= 6.0 in the WHERE clause.")
        .with_answer(level_5),
        Level::new(
            6,
            "Blood Evidence",
            "A shard of glass where the bullet was fired carried dried blood. ABO testing came back \
             O positive. Find the names of all suspects with blood type O+.",
            level_6.clone(),
        )
        .with_hint("Match suspects whose blood_type is 'O+'.")
        .with_answer(level_6),
        Level::new(
            7,
            "The Murder Weapon",
            "The murder weapon turned up in a nearby river. Its serial number shows John Doe as the \
             last owner, and a witness says he sold the gun to a close friend. Find the names of \
             all suspects who were close friends of the victim, John Doe.",
            level_7.clone(),
        )
        .with_hint("Follow CLOSE_FRIEND_OF relationships from suspects to the victim John Doe.")
        .with_answer(level_7),
        Level::new(
            8,
            "The Money Trail",
            "An anonymous tip says the murderer made deposits into several banks adding up to \
             exactly $475,500. Find the name of the suspect whose deposits across all banks total \
             this amount.",
            level_8.clone(),
        )
        .with_hint(
            "Sum the DEPOSITED_IN amounts per suspect with SUM(), grouping by suspect in a WITH \
             clause before filtering on the total.",
        )
        .with_answer(level_8),
    ]
}
