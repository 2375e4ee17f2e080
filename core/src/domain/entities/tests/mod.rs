mod code_record_tests;
