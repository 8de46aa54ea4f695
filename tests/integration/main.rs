mod common;

mod branch_flow_test;
mod health_test;
mod proxy_test;
