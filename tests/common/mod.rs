#[cfg(not(feature = "acceptance-tests"))]
mod mock_server;
