pub mod add;
pub mod health;
pub mod organizations;
