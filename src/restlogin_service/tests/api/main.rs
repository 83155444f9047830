mod entry_point;
mod health;
mod helpers;
mod login;
