// Build script to bake the Spotify client id in at compile time (optional)
fn main() {
    // .env is optional: without it the client id must come from config or THEMESIFY_CLIENT_ID
    if let Err(e) = dotenvy::dotenv() {
        println!("cargo:warning=No .env file loaded ({}), client id must be configured at runtime", e);
    }

    if let Ok(client_id) = std::env::var("SPOTIFY_CLIENT_ID") {
        println!("cargo:rustc-env=SPOTIFY_CLIENT_ID={}", client_id);
    }
    println!("cargo:rerun-if-changed=.env");
    println!("cargo:rerun-if-env-changed=SPOTIFY_CLIENT_ID");
}
