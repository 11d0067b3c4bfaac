mod log_format_test;
