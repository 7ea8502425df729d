//! Seed data set used when durable storage has no collections yet.
//!
//! Seeded mark totals are derived with `calculate_total_marks`, so the seed
//! satisfies the same invariants as store-written data.

use crate::model::mark::{calculate_total_marks, Mark};
use crate::model::module::Module;
use crate::model::trade::Trade;
use crate::model::trainee::{Gender, Trainee};
use crate::model::user::User;

pub fn trades() -> Vec<Trade> {
    [
        (1, "Software Development L3"),
        (2, "Software Development L4"),
        (3, "Software Development L5"),
        (4, "Multimedia L3"),
        (5, "Multimedia L4"),
    ]
    .into_iter()
    .map(|(trade_id, name)| Trade {
        trade_id,
        trade_name: name.to_string(),
    })
    .collect()
}

pub fn trainees() -> Vec<Trainee> {
    [
        (1, "John", "Doe", Gender::Male, 1),
        (2, "Jane", "Smith", Gender::Female, 1),
        (3, "Michael", "Johnson", Gender::Male, 2),
        (4, "Emily", "Wilson", Gender::Female, 3),
        (5, "David", "Brown", Gender::Male, 4),
    ]
    .into_iter()
    .map(|(trainee_id, first, last, gender, trade_id)| Trainee {
        trainee_id,
        first_names: first.to_string(),
        last_name: last.to_string(),
        gender,
        trade_id,
    })
    .collect()
}

pub fn modules() -> Vec<Module> {
    [
        (1, "Web Development", 20),
        (2, "Database Design", 15),
        (3, "Programming Fundamentals", 25),
        (4, "UI/UX Design", 15),
        (5, "Mobile Development", 20),
    ]
    .into_iter()
    .map(|(module_id, name, mod_credits)| Module {
        module_id,
        mod_name: name.to_string(),
        mod_credits,
    })
    .collect()
}

pub fn users() -> Vec<User> {
    vec![
        User {
            user_id: 1,
            username: "admin".to_string(),
        },
        User {
            user_id: 2,
            username: "deputy".to_string(),
        },
    ]
}

pub fn marks() -> Vec<Mark> {
    // (mark, trainee, trade, module, author, formative, summative, comprehensive)
    [
        (1, 1, 1, 1, 2, 80, 75, 85),
        (2, 1, 1, 2, 2, 70, 80, 75),
        (3, 2, 1, 1, 2, 85, 90, 80),
        (4, 3, 2, 3, 2, 75, 70, 80),
        (5, 4, 3, 5, 2, 90, 85, 95),
    ]
    .into_iter()
    .map(
        |(mark_id, trainee_id, trade_id, module_id, user_id, formative, summative, comprehensive)| {
            Mark {
                mark_id,
                trainee_id,
                trade_id,
                module_id,
                user_id,
                formative_ass: formative,
                summative_ass: summative,
                comprehensive_ass: comprehensive,
                total_marks100: calculate_total_marks(formative, summative, comprehensive),
            }
        },
    )
    .collect()
}
