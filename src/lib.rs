//! # BarberPro
//!
//! Server-rendered web app for the BarberPro barbershop, built with Axum on top
//! of a hosted Postgres backend (PostgREST rows plus GoTrue accounts).
//!
//! ## Overview
//!
//! - **Sign-in**: e-mail and password against the backend's auth service; the
//!   app then issues its own session JWT in an HttpOnly cookie
//! - **Role gate**: every dashboard is reachable by exactly one role; others are
//!   redirected to their own dashboard, anonymous visitors to the login page
//! - **Dashboards**: admin (entity counts, catalogue), barber (weekly hours,
//!   appointments), customer (appointments, active services)
//! - **Connection test**: `/test` renders the same health report as
//!   `barberpro-cli health-check`
//!
//! ## Architecture
//!
//! ```text
//! src/
//! ├── middleware/       # Session extractor and role gate
//! ├── modules/          # Feature modules
//! │   ├── auth/        # Login and logout
//! │   ├── dashboard/   # Role dashboards
//! │   └── home/        # Landing page, connection test, fallback
//! ├── html.rs           # Page layout and escaping
//! ├── router.rs         # Main application router
//! ├── state.rs          # Shared application state
//! └── validator.rs      # Form validation
//! ```
//!
//! Each feature module follows the same structure: `controller.rs` (handlers),
//! `service.rs` (backend calls), `model.rs` (forms and DTOs), `router.rs` and a
//! private `view.rs` rendering HTML.
//!
//! ## Routes
//!
//! | Path | Access |
//! |------|--------|
//! | `/` | public |
//! | `/test` | public |
//! | `/auth/login` | public (GET form, POST sign-in) |
//! | `/auth/logout` | POST |
//! | `/admin` | admin |
//! | `/barber` | barber |
//! | `/customer` | customer |
//! | anything else | redirect to `/auth/login` |
//!
//! ## Environment Variables
//!
//! ```bash
//! SUPABASE_URL=https://project.supabase.co
//! SUPABASE_ANON_KEY=...
//! SUPABASE_SERVICE_ROLE_KEY=...   # required: dashboard reads bypass row-level security
//! JWT_SECRET=your-secure-secret-key
//! JWT_ACCESS_EXPIRY=28800
//! BIND_ADDR=0.0.0.0:3000
//! ```

pub mod html;
pub mod middleware;
pub mod modules;
pub mod router;
pub mod state;
pub mod validator;

// Re-export workspace crates for convenience
pub use barberpro_auth;
pub use barberpro_backend;
pub use barberpro_config;
pub use barberpro_core;
pub use barberpro_models;
