//! Request constructors for every remote endpoint the suite calls.

use restcheck_domain::{
    BasicCredentials, DomainResult, HttpMethod, RegistrationRequest, RequestSpec,
    request::APPLICATION_JSON,
};
use restcheck_infrastructure::HarnessConfig;

/// Base URLs of the services under test.
#[derive(Debug, Clone)]
pub struct Endpoints {
    weather: String,
    ergast: String,
    md5: String,
    registration: String,
    secured: Option<String>,
}

impl Endpoints {
    /// Takes every base URL from `config`.
    #[must_use]
    pub fn from_config(config: &HarnessConfig) -> Self {
        Self {
            weather: config.weather_url.clone(),
            ergast: config.ergast_url.clone(),
            md5: config.md5_url.clone(),
            registration: config.registration_url.clone(),
            secured: config.secured_url().map(ToString::to_string),
        }
    }

    /// `GET {weather}/{city}`
    #[must_use]
    pub fn weather_by_city(&self, city: &str) -> RequestSpec {
        RequestSpec::get(&self.weather)
            .with_path("/{city}")
            .path_param("city", city)
    }

    /// `GET {ergast}/{season}/circuits.json`
    #[must_use]
    pub fn circuits_for_season(&self, season: &str) -> RequestSpec {
        RequestSpec::get(&self.ergast)
            .with_path("/{season}/circuits.json")
            .path_param("season", season)
    }

    /// `GET {ergast}/circuits/{circuitId}.json`
    #[must_use]
    pub fn circuit_by_id(&self, circuit_id: &str) -> RequestSpec {
        RequestSpec::get(&self.ergast)
            .with_path("/circuits/{circuitId}.json")
            .path_param("circuitId", circuit_id)
    }

    /// `GET {md5}?text=...`
    #[must_use]
    pub fn md5_of(&self, text: &str) -> RequestSpec {
        RequestSpec::get(&self.md5).query_param("text", text)
    }

    /// `POST {registration}` with the customer as JSON.
    ///
    /// # Errors
    ///
    /// Fails if the customer cannot be serialized.
    pub fn register_customer(&self, customer: &RegistrationRequest) -> DomainResult<RequestSpec> {
        RequestSpec::post(&self.registration)
            .accept(APPLICATION_JSON)
            .content_type(APPLICATION_JSON)
            .json_body(customer)
    }

    /// The registration request sent with the wrong method.
    ///
    /// # Errors
    ///
    /// Fails if the customer cannot be serialized.
    pub fn register_customer_with_get(
        &self,
        customer: &RegistrationRequest,
    ) -> DomainResult<RequestSpec> {
        Ok(self.register_customer(customer)?.with_method(HttpMethod::Get))
    }

    /// `GET {secured}` with preemptive basic auth, when a secured URL is configured.
    #[must_use]
    pub fn basic_auth_check(&self, credentials: BasicCredentials) -> Option<RequestSpec> {
        self.secured
            .as_ref()
            .map(|url| RequestSpec::get(url).basic_auth(credentials))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use crate::fixtures;
    use pretty_assertions::assert_eq;

    fn endpoints() -> Endpoints {
        Endpoints::from_config(&HarnessConfig::from_vars(HashMap::new()).unwrap())
    }

    #[test]
    fn test_urls() {
        let endpoints = endpoints();

        assert_eq!(
            endpoints.weather_by_city("Hyderabad").full_url().unwrap().as_str(),
            "http://restapi.demoqa.com/utilities/weather/city/Hyderabad"
        );
        assert_eq!(
            endpoints.circuits_for_season("2017").full_url().unwrap().as_str(),
            "http://ergast.com/api/f1/2017/circuits.json"
        );
        assert_eq!(
            endpoints.circuit_by_id("albert_park").full_url().unwrap().as_str(),
            "http://ergast.com/api/f1/circuits/albert_park.json"
        );
        assert_eq!(
            endpoints.md5_of("test").full_url().unwrap().as_str(),
            "http://md5.jsontest.com/?text=test"
        );
    }

    #[test]
    fn test_registration_requests() {
        let endpoints = endpoints();
        let customer = fixtures::unique_customer();

        let post = endpoints.register_customer(&customer).unwrap();
        assert_eq!(post.method, HttpMethod::Post);
        assert_eq!(post.headers.get("Content-Type"), Some(APPLICATION_JSON));
        assert_eq!(
            post.body.as_ref().unwrap()["UserName"],
            customer.user_name.as_str()
        );

        let get = endpoints.register_customer_with_get(&customer).unwrap();
        assert_eq!(get.method, HttpMethod::Get);
        assert_eq!(get.body, post.body);
    }

    #[test]
    fn test_basic_auth_check_needs_secured_url() {
        let credentials = BasicCredentials::new("user", "pass");
        assert!(endpoints().basic_auth_check(credentials.clone()).is_none());

        let mut vars = HashMap::new();
        vars.insert(
            "RESTCHECK_SECURED_URL".to_string(),
            "http://localhost/secured".to_string(),
        );
        let configured = Endpoints::from_config(&HarnessConfig::from_vars(vars).unwrap());
        let request = configured.basic_auth_check(credentials).unwrap();
        assert!(request.auth.is_some());
    }
}
