pub mod signup_login;
