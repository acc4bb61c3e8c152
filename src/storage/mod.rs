pub mod session_cookie;
