//! # HTTP Handlers
//!
//! | route | handler |
//! |---|---|
//! | `GET /api/health` | [`health::health`] |
//! | `POST /api/register` | [`auth::register`] |
//! | `POST /api/login` | [`auth::login`] |
//! | `POST /api/logout` | [`auth::logout`] |
//! | `GET /api/user` | [`auth::current_user`] |
//! | `GET /api/wallet` | [`wallet::get_wallet`] |
//! | `GET /api/transactions` | [`transactions::list_transactions`] |
//! | `POST /api/transactions/transfer` | [`transactions::transfer`] |
//! | `GET /api/admin/users` | [`admin::list_users`] |
//! | `POST /api/superadmin/mint` | [`superadmin::mint`] |

pub mod admin;
pub mod auth;
pub mod health;
pub mod superadmin;
pub mod transactions;
pub mod wallet;
