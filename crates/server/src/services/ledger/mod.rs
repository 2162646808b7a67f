pub mod ledger_service;
