pub mod health;
pub mod time;
pub mod userinfo;
