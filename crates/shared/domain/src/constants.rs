//! Domain-level constants.
//!
//! These constants define business rules and validation requirements.

// =============================================================================
// Roles
// =============================================================================

/// Default role assigned to newly registered accounts
pub const ROLE_USER: &str = "user";

/// Administrator role with elevated privileges
pub const ROLE_ADMIN: &str = "admin";

// =============================================================================
// Account status
// =============================================================================

/// Account created by registration, waiting for its invitation to be redeemed
pub const STATUS_PENDING: &str = "pending";

/// Account whose invitation has been redeemed
pub const STATUS_ACTIVE: &str = "active";

// =============================================================================
// Validation
// =============================================================================

/// Minimum password length requirement
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Maximum password length accepted at registration
pub const MAX_PASSWORD_LENGTH: usize = 72;

/// Maximum length of first name, last name, country and requested username
pub const MAX_NAME_LENGTH: usize = 100;

/// Maximum email length
pub const MAX_EMAIL_LENGTH: usize = 255;

// =============================================================================
// Username allocation
// =============================================================================

/// Total attempts to persist a registration before giving up on username collisions
pub const MAX_USERNAME_ATTEMPTS: usize = 5;

/// Generated usernames keep at most this many characters of the derived base
pub const USERNAME_BASE_MAX_LENGTH: usize = 20;

/// Random suffix appended to every generated username
pub const USERNAME_SUFFIX_LENGTH: usize = 6;

/// Length of the random base used when profile data yields nothing usable
pub const USERNAME_FALLBACK_LENGTH: usize = 12;

// =============================================================================
// Invitations
// =============================================================================

/// Random bytes behind every invitation token (256 bits)
pub const INVITATION_TOKEN_BYTES: usize = 32;

/// Default invitation lifetime in hours (3 days)
pub const DEFAULT_INVITATION_EXPIRY_HOURS: i64 = 72;

/// Longest accepted invitation lifetime in hours (1 year)
pub const MAX_INVITATION_EXPIRY_HOURS: i64 = 8760;

/// Mail template used for the invitation sent at registration
pub const USER_INVITATION_TEMPLATE: &str = "user_invitation";

// =============================================================================
// Authentication
// =============================================================================

/// Default JWT token expiration in hours (3 days)
pub const DEFAULT_JWT_EXPIRATION_HOURS: i64 = 72;

/// Longest accepted JWT token expiration in hours (1 year)
pub const MAX_JWT_EXPIRATION_HOURS: i64 = 8760;

/// Minimum JWT secret length (security requirement)
pub const MIN_JWT_SECRET_LENGTH: usize = 32;

/// Default issuer and audience of session tokens
pub const DEFAULT_TOKEN_ISSUER: &str = "social";

/// JWT token type identifier
pub const TOKEN_TYPE_BEARER: &str = "Bearer";
