pub mod auth;
pub mod friends;
pub mod hobbies;
pub mod profile;
pub mod similarity;
