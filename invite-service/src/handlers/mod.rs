pub mod invite_handlers;
