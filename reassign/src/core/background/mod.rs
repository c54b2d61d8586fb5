pub mod signal_listener;
