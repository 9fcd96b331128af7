pub mod loading_state;
pub mod result_page;
