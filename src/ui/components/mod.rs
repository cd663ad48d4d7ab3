pub mod data_panel;
pub mod message_card;
pub mod simple_printer;
pub mod toggle_button;
pub mod topic_filter;
