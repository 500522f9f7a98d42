pub mod send_push;
