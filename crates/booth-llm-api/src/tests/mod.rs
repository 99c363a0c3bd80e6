mod response_parsing_tests;
