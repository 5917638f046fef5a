use waqt::{Method, Settings, TimeName};

fn main() -> waqt::Result<()> {
    let settings = Settings::builder()
        .method(Method::Isna)
        .location(43.0, -80.0)
        .timezone(chrono_tz::America::Toronto)
        .build()?;

    let times = settings.times(2024, 6, 21)?;
    for name in TimeName::ALL {
        println!("{name:>8}: {}", times[&name]);
    }
    Ok(())
}
