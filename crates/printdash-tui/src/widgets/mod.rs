pub mod filter_popup;
