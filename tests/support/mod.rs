#![allow(dead_code)]

use chrono::NaiveDate;
use reelstore::{Film, Genre, User};

pub fn user(email: &str) -> User {
    User {
        id: 0,
        email: email.to_string(),
        login: email.split('@').next().unwrap().to_string(),
        name: "Test User".to_string(),
        password_hash: "not-a-real-hash".to_string(),
        birthday: NaiveDate::from_ymd_opt(1990, 1, 1),
        friends: Vec::new(),
        favourites: Vec::new(),
    }
}

pub fn film(title: &str, genres: &[Genre], year: i32, month: u32, day: u32) -> Film {
    Film {
        id: 0,
        title: title.to_string(),
        description: format!("{} (test fixture)", title),
        genres: genres.iter().copied().collect(),
        directors: Vec::new(),
        release_date: NaiveDate::from_ymd_opt(year, month, day).unwrap(),
        duration_minutes: 100,
    }
}
