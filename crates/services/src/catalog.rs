use serde::Serialize;

/// One entry of the built-in lesson catalog.
///
/// The catalog is static content shipped with the backend; nothing here
/// touches storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LearningModule {
    pub id: &'static str,
    pub title: &'static str,
    pub subject: &'static str,
    pub description: &'static str,
    pub content: &'static str,
    pub difficulty: &'static str,
    #[serde(rename = "estimatedTime")]
    pub estimated_time: &'static str,
}

const MODULES: &[LearningModule] = &[
    LearningModule {
        id: "sci-solar",
        title: "Solar System",
        subject: "Science",
        description: "Explore planets, stars, and our solar system with 3D models",
        content: "The Solar System consists of the Sun and everything that orbits it, \
                  including planets, moons, asteroids, and comets.",
        difficulty: "Beginner",
        estimated_time: "30 mins",
    },
    LearningModule {
        id: "math-fractions",
        title: "Understanding Fractions",
        subject: "Mathematics",
        description: "Learn fractions with visual examples and practice",
        content: "A fraction represents a part of a whole. It consists of a numerator \
                  (top number) and denominator (bottom number).",
        difficulty: "Beginner",
        estimated_time: "25 mins",
    },
    LearningModule {
        id: "sci-circuits",
        title: "Electric Circuits",
        subject: "Science",
        description: "Understand electricity and circuits with interactive diagrams",
        content: "An electric circuit is a closed path through which electric current flows. \
                  It includes a power source, wires, and load.",
        difficulty: "Intermediate",
        estimated_time: "40 mins",
    },
    LearningModule {
        id: "math-algebra",
        title: "Basic Algebra",
        subject: "Mathematics",
        description: "Introduction to variables and equations",
        content: "Algebra uses letters to represent numbers in equations. \
                  For example: x + 5 = 10, where x = 5.",
        difficulty: "Intermediate",
        estimated_time: "35 mins",
    },
    LearningModule {
        id: "social-india",
        title: "Geography of India",
        subject: "Social Studies",
        description: "Learn about Indian states, rivers, and geography",
        content: "India is the 7th largest country by area. It has diverse geography \
                  including mountains, plains, deserts, and coastal regions.",
        difficulty: "Beginner",
        estimated_time: "30 mins",
    },
    LearningModule {
        id: "sci-plants",
        title: "Plant Life Cycle",
        subject: "Science",
        description: "Discover how plants grow and reproduce",
        content: "Plants go through stages: seed, germination, growth, reproduction, \
                  and seed dispersal.",
        difficulty: "Beginner",
        estimated_time: "20 mins",
    },
];

/// List catalog modules, optionally filtered by subject (case-insensitive).
#[must_use]
pub fn list(subject: Option<&str>) -> Vec<LearningModule> {
    match subject {
        Some(filter) => MODULES
            .iter()
            .filter(|m| m.subject.eq_ignore_ascii_case(filter))
            .cloned()
            .collect(),
        None => MODULES.to_vec(),
    }
}

/// Look up a single module by id.
#[must_use]
pub fn get(id: &str) -> Option<LearningModule> {
    MODULES.iter().find(|m| m.id == id).cloned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_catalog_lists_every_module() {
        assert_eq!(list(None).len(), 6);
    }

    #[test]
    fn subject_filter_is_case_insensitive() {
        let science = list(Some("science"));
        assert_eq!(science.len(), 3);
        assert!(science.iter().all(|m| m.subject == "Science"));

        assert!(list(Some("History")).is_empty());
    }

    #[test]
    fn lookup_by_id() {
        let module = get("math-fractions").unwrap();
        assert_eq!(module.title, "Understanding Fractions");

        assert!(get("no-such-module").is_none());
    }
}
