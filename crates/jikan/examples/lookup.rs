//! Example: Query a few endpoints and print a summary of each reply
//!
//! Run with: cargo run -p jikan --example lookup
//!
//! Uses the public API, so results depend on network access.

use jikan::{ApiRequest, Client, Reply, SearchType, Season, TopType};

#[tokio::main]
async fn main() {
    let client = match Client::new() {
        Ok(client) => client,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    let requests = [
        ("Anime by id", ApiRequest::anime(1)),
        ("Episodes", ApiRequest::anime(1).segment("episodes")),
        (
            "Search",
            ApiRequest::search(SearchType::Anime)
                .param("q", "cowboy bebop")
                .param("limit", 3),
        ),
        ("Season", ApiRequest::season(2018, Season::Winter)),
        ("Top upcoming", ApiRequest::top(TopType::Anime).segment(1u64).segment("upcoming")),
        ("Missing anime", ApiRequest::anime(0)),
    ];

    for (i, (description, request)) in requests.iter().enumerate() {
        println!("{}. {} ({})", i + 1, description, request.relative_url());

        match client.send(request).await {
            Ok(Reply::Success(resp)) => {
                println!("   OK {:?}, {} fields", resp.status(), resp.as_map().len());
            }
            Ok(Reply::Failure(failure)) => {
                println!("   FAILED {:?}: {:?}", failure.reason, failure.response.status());
            }
            Err(e) => println!("   ERROR {}", e),
        }
    }
}
