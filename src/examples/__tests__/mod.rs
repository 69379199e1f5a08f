mod grammar_test;
mod lexing_test;
mod visitor_test;
