//! Exercise catalog - ids referenced by set logs and personal records

use std::str::FromStr;

use serde::Serialize;

use crate::error::ValidationError;

/// Muscle groups targeted by an exercise
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
pub enum MuscleGroup {
    Chest,
    Shoulders,
    Triceps,
    Back,
    Biceps,
    Core,
    Glutes,
    Quads,
    Hamstrings,
    Calves,
}

impl MuscleGroup {
    pub fn name(&self) -> &'static str {
        match self {
            MuscleGroup::Chest => "chest",
            MuscleGroup::Shoulders => "shoulders",
            MuscleGroup::Triceps => "triceps",
            MuscleGroup::Back => "back",
            MuscleGroup::Biceps => "biceps",
            MuscleGroup::Core => "core",
            MuscleGroup::Glutes => "glutes",
            MuscleGroup::Quads => "quads",
            MuscleGroup::Hamstrings => "hamstrings",
            MuscleGroup::Calves => "calves",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum Category {
    Push,
    Pull,
    Legs,
    Core,
}

impl Category {
    pub fn name(&self) -> &'static str {
        match self {
            Category::Push => "push",
            Category::Pull => "pull",
            Category::Legs => "legs",
            Category::Core => "core",
        }
    }
}

impl FromStr for Category {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "push" => Ok(Category::Push),
            "pull" => Ok(Category::Pull),
            "legs" => Ok(Category::Legs),
            "core" => Ok(Category::Core),
            _ => Err(ValidationError::UnknownCategory(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum Equipment {
    Barbell,
    Dumbbell,
    Machine,
    Cable,
    Bodyweight,
}

#[derive(Debug, Clone, Serialize)]
pub struct Exercise {
    pub id: &'static str,
    pub name: &'static str,
    pub category: Category,
    pub muscle_groups: &'static [MuscleGroup],
    pub equipment: Equipment,
}

pub const EXERCISES: &[Exercise] = &[
    Exercise {
        id: "bench_press",
        name: "Bench Press",
        category: Category::Push,
        muscle_groups: &[MuscleGroup::Chest, MuscleGroup::Triceps, MuscleGroup::Shoulders],
        equipment: Equipment::Barbell,
    },
    Exercise {
        id: "incline_dumbbell_press",
        name: "Incline Dumbbell Press",
        category: Category::Push,
        muscle_groups: &[MuscleGroup::Chest, MuscleGroup::Shoulders],
        equipment: Equipment::Dumbbell,
    },
    Exercise {
        id: "overhead_press",
        name: "Overhead Press",
        category: Category::Push,
        muscle_groups: &[MuscleGroup::Shoulders, MuscleGroup::Triceps, MuscleGroup::Core],
        equipment: Equipment::Barbell,
    },
    Exercise {
        id: "dip",
        name: "Dip",
        category: Category::Push,
        muscle_groups: &[MuscleGroup::Triceps, MuscleGroup::Chest],
        equipment: Equipment::Bodyweight,
    },
    Exercise {
        id: "deadlift",
        name: "Deadlift",
        category: Category::Pull,
        muscle_groups: &[MuscleGroup::Back, MuscleGroup::Hamstrings, MuscleGroup::Glutes],
        equipment: Equipment::Barbell,
    },
    Exercise {
        id: "barbell_row",
        name: "Barbell Row",
        category: Category::Pull,
        muscle_groups: &[MuscleGroup::Back, MuscleGroup::Biceps],
        equipment: Equipment::Barbell,
    },
    Exercise {
        id: "lat_pulldown",
        name: "Lat Pulldown",
        category: Category::Pull,
        muscle_groups: &[MuscleGroup::Back, MuscleGroup::Biceps],
        equipment: Equipment::Cable,
    },
    Exercise {
        id: "pull_up",
        name: "Pull-up",
        category: Category::Pull,
        muscle_groups: &[MuscleGroup::Back, MuscleGroup::Biceps],
        equipment: Equipment::Bodyweight,
    },
    Exercise {
        id: "bicep_curl",
        name: "Bicep Curl",
        category: Category::Pull,
        muscle_groups: &[MuscleGroup::Biceps],
        equipment: Equipment::Dumbbell,
    },
    Exercise {
        id: "back_squat",
        name: "Back Squat",
        category: Category::Legs,
        muscle_groups: &[MuscleGroup::Quads, MuscleGroup::Glutes, MuscleGroup::Core],
        equipment: Equipment::Barbell,
    },
    Exercise {
        id: "romanian_deadlift",
        name: "Romanian Deadlift",
        category: Category::Legs,
        muscle_groups: &[MuscleGroup::Hamstrings, MuscleGroup::Glutes],
        equipment: Equipment::Barbell,
    },
    Exercise {
        id: "leg_press",
        name: "Leg Press",
        category: Category::Legs,
        muscle_groups: &[MuscleGroup::Quads, MuscleGroup::Glutes],
        equipment: Equipment::Machine,
    },
    Exercise {
        id: "calf_raise",
        name: "Standing Calf Raise",
        category: Category::Legs,
        muscle_groups: &[MuscleGroup::Calves],
        equipment: Equipment::Machine,
    },
    Exercise {
        id: "hanging_leg_raise",
        name: "Hanging Leg Raise",
        category: Category::Core,
        muscle_groups: &[MuscleGroup::Core],
        equipment: Equipment::Bodyweight,
    },
    Exercise {
        id: "cable_crunch",
        name: "Cable Crunch",
        category: Category::Core,
        muscle_groups: &[MuscleGroup::Core],
        equipment: Equipment::Cable,
    },
];

pub fn get_all_exercises() -> &'static [Exercise] {
    EXERCISES
}

pub fn find_exercise(id: &str) -> Option<&'static Exercise> {
    EXERCISES.iter().find(|e| e.id == id)
}

/// Display name for an exercise id, falling back to the id itself
pub fn exercise_name(id: &str) -> &str {
    find_exercise(id).map(|e| e.name).unwrap_or(id)
}

pub fn exercises_in(category: Category) -> impl Iterator<Item = &'static Exercise> {
    EXERCISES.iter().filter(move |e| e.category == category)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_ids_unique() {
        let ids: HashSet<_> = EXERCISES.iter().map(|e| e.id).collect();
        assert_eq!(ids.len(), EXERCISES.len());
    }

    #[test]
    fn test_find_exercise() {
        assert_eq!(find_exercise("deadlift").unwrap().name, "Deadlift");
        assert!(find_exercise("Deadlift").is_none());
    }

    #[test]
    fn test_exercise_name_fallback() {
        assert_eq!(exercise_name("back_squat"), "Back Squat");
        assert_eq!(exercise_name("retired_lift"), "retired_lift");
    }

    #[test]
    fn test_every_category_populated() {
        for category in [Category::Push, Category::Pull, Category::Legs, Category::Core] {
            assert!(exercises_in(category).count() > 0, "{} is empty", category.name());
            assert_eq!(category.name().parse::<Category>().unwrap(), category);
        }
        assert!("arms".parse::<Category>().is_err());
    }
}
