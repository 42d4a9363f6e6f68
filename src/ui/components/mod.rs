pub mod entry_list;
pub mod flashcard_view;
pub mod match_board;
pub mod progress_bar;
pub mod summary;
