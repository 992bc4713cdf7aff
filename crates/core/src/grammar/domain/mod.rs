pub mod finite_state_grammar;
