use anyhow::Error;
use clap::Parser;
use model::{
    airport::{Airport, FuelType, Point},
    emit::{self, DEFAULT_OUTPUT},
    query::{self, Filter, Query},
};
use serde::Deserialize;
use serde_json::json;
use std::path::PathBuf;
use std::sync::Arc;
use tide::{Request, Response, StatusCode};

#[cfg(test)]
mod test_runner;

/// Start the airport map server.
#[derive(Clone, Debug, Parser)]
struct Options {
    /// The port where the app should be served.
    #[clap(short, long, env = "NASR_PORT", default_value = "80")]
    port: u16,

    /// Directory containing the static map UI.
    #[clap(long, env = "NASR_PUBLIC_DIR", default_value = "public")]
    public: PathBuf,

    /// The airport list written by `nasr pull`.
    #[clap(long, env = "NASR_DATA", default_value = DEFAULT_OUTPUT)]
    data: PathBuf,
}

/// Shared server state.
#[derive(Clone)]
struct State {
    airports: Arc<Vec<Airport>>,
}

impl Options {
    fn app(&self) -> Result<tide::Server<State>, Error> {
        let airports = emit::read_json(&self.data)?;
        tracing::info!(
            "serving {} airports from {}",
            airports.len(),
            self.data.display()
        );

        let mut app = tide::with_state(State {
            airports: Arc::new(airports),
        });
        app.at("/api/health").get(health);
        app.at("/api/states").get(states);
        app.at("/api/airports").get(airports_page);

        if self.public.is_dir() {
            app.at("/").serve_dir(&self.public)?;
            let index = self.public.join("index.html");
            if index.is_file() {
                app.at("/").serve_file(index)?;
            }
        } else {
            tracing::warn!(
                "static directory {} does not exist, serving the API only",
                self.public.display()
            );
        }

        Ok(app)
    }

    async fn serve(self) -> Result<(), Error> {
        let app = self.app()?;
        app.listen(format!("0.0.0.0:{}", self.port)).await?;
        Ok(())
    }
}

#[async_std::main]
async fn main() -> Result<(), Error> {
    model::init_logging();
    Options::parse().serve().await
}

async fn health(req: Request<State>) -> tide::Result {
    Ok(json!({
        "status": "ok",
        "airports": req.state().airports.len(),
    })
    .into())
}

async fn states(req: Request<State>) -> tide::Result {
    Ok(json!(query::states(&req.state().airports)).into())
}

/// Query string accepted by `/api/airports`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct Params {
    /// Comma-separated state codes.
    state: Option<String>,
    /// Comma-separated fuel types.
    fuel: Option<String>,
    q: Option<String>,
    lat: Option<f64>,
    lon: Option<f64>,
    offset: Option<usize>,
    limit: Option<usize>,
}

impl TryFrom<Params> for Query {
    type Error = tide::Error;

    fn try_from(params: Params) -> Result<Self, Self::Error> {
        let states = split(params.state.as_deref())
            .map(str::to_uppercase)
            .collect();
        let fuel = split(params.fuel.as_deref())
            .map(|fuel| {
                fuel.parse::<FuelType>().map_err(|_| {
                    tide::Error::from_str(
                        StatusCode::BadRequest,
                        format!("unknown fuel type {fuel}"),
                    )
                })
            })
            .collect::<Result<_, _>>()?;
        let origin = match (params.lat, params.lon) {
            (Some(lat), Some(lon)) => Some(
                Point::new(lat, lon)
                    .map_err(|err| tide::Error::from_str(StatusCode::BadRequest, err))?,
            ),
            (None, None) => None,
            _ => {
                return Err(tide::Error::from_str(
                    StatusCode::BadRequest,
                    "lat and lon must be given together",
                ))
            }
        };
        Ok(Query {
            filter: Filter {
                states,
                fuel,
                search: params.q.filter(|q| !q.trim().is_empty()),
            },
            origin,
            offset: params.offset.unwrap_or(0),
            limit: params.limit,
        })
    }
}

fn split(list: Option<&str>) -> impl Iterator<Item = &str> {
    list.into_iter()
        .flat_map(|list| list.split(','))
        .map(str::trim)
        .filter(|item| !item.is_empty())
}

async fn airports_page(req: Request<State>) -> tide::Result {
    let query = Query::try_from(req.query::<Params>()?)?;
    tracing::debug!(?query, "airport query");
    let page = query.run(&req.state().airports);
    let mut res = Response::new(StatusCode::Ok);
    res.set_body(tide::Body::from_json(&page)?);
    Ok(res)
}
