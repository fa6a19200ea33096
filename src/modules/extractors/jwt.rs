use secrecy::Secret;

#[derive(Clone)]
pub struct JwtSecret(pub Secret<String>);
