// End-to-end tests for the Rap Battle Backend API
//
// Each test starts the real axum router on an ephemeral port. Storage is an
// in-memory user repository and every TTS vendor is a recording fake, so the
// suite needs neither a database nor network access to vendor APIs.

mod test_tts;
mod test_user;
