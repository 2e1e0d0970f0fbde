pub mod time;
pub mod userinfo;
