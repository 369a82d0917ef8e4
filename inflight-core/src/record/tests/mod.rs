mod url_tests;
