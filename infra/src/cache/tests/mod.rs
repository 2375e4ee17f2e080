mod redis_client_tests;
mod redis_code_store_tests;
