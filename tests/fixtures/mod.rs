pub mod sample_graphs;
