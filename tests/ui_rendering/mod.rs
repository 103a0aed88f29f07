pub mod common;

mod chat_render_test;
mod repl_key_flow_test;
mod scroll_mouse_test;
