use std::sync::Arc;

use axum::async_trait;
use tracing::info;

use crate::{
    config::AppConfig,
    db::{MemoryStore, PgStore, Store},
    goals::Goal,
    graphql::{build_schema, AppSchema},
    meals::Meal,
    relations::RelationService,
    resource::ResourceService,
    trainers::Trainer,
    users::User,
    weather::{OpenWeatherClient, Weather, WeatherError, WeatherProvider},
    workouts::Workout,
};

/// One service per entity plus the relationship queries, all sharing the
/// same store.
#[derive(Clone)]
pub struct Services {
    pub users: ResourceService<User>,
    pub workouts: ResourceService<Workout>,
    pub meals: ResourceService<Meal>,
    pub goals: ResourceService<Goal>,
    pub trainers: ResourceService<Trainer>,
    pub relations: RelationService,
}

impl Services {
    pub fn new<S: Store + 'static>(store: Arc<S>) -> Self {
        Self {
            users: ResourceService::<User>::new(store.clone()),
            workouts: ResourceService::<Workout>::new(store.clone()),
            meals: ResourceService::<Meal>::new(store.clone()),
            goals: ResourceService::<Goal>::new(store.clone()),
            trainers: ResourceService::<Trainer>::new(store.clone()),
            relations: RelationService::new(store),
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub services: Services,
    pub weather: Arc<dyn WeatherProvider>,
    pub schema: AppSchema,
}

impl AppState {
    /// Connects the store chosen by `NODE_ENV` and syncs its schema.
    pub async fn init(config: AppConfig) -> anyhow::Result<Self> {
        let services = if config.uses_memory_store() {
            info!("using in-memory store");
            Services::new(Arc::new(MemoryStore::new()))
        } else {
            let store = PgStore::connect(&config.database).await?;
            store.sync_schema().await?;
            Services::new(Arc::new(store))
        };
        let weather = Arc::new(OpenWeatherClient::new(&config.weather)) as Arc<dyn WeatherProvider>;
        Ok(Self::from_parts(Arc::new(config), services, weather))
    }

    pub fn from_parts(
        config: Arc<AppConfig>,
        services: Services,
        weather: Arc<dyn WeatherProvider>,
    ) -> Self {
        let schema = build_schema(services.clone(), weather.clone());
        Self {
            config,
            services,
            weather,
            schema,
        }
    }

    /// Empty memory store and a canned weather provider that only knows
    /// Paris.
    pub fn fake() -> Self {
        struct FakeWeather;
        #[async_trait]
        impl WeatherProvider for FakeWeather {
            async fn current(&self, city: &str) -> Result<Weather, WeatherError> {
                if city != "Paris" {
                    return Err(WeatherError::Malformed(format!("unknown city {city}")));
                }
                Ok(Weather {
                    city: "Paris".into(),
                    temperature: 21.0,
                    description: "clear sky".into(),
                    humidity: 40,
                    wind_speed: 2.5,
                })
            }
        }

        Self::with_config(AppConfig::for_tests(), Arc::new(FakeWeather))
    }

    pub fn with_config(config: AppConfig, weather: Arc<dyn WeatherProvider>) -> Self {
        let services = Services::new(Arc::new(MemoryStore::new()));
        Self::from_parts(Arc::new(config), services, weather)
    }
}
