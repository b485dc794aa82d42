//! Builtin weather station universe.
//!
//! Names with typical yearly temperature extremes in whole degrees Celsius.
//! Each name appears once.

/// `(name, low, high)` for every builtin station.
pub const STATIONS: &[(&str, i8, i8)] = &[
    ("Abéché", -5, 45),
    ("Abidjan", 20, 35),
    ("Abuja", 18, 38),
    ("Accra", 22, 32),
    ("Addis Ababa", 8, 28),
    ("Alexandria", 8, 32),
    ("Algiers", 5, 35),
    ("Bamako", 18, 40),
    ("Bangui", 18, 35),
    ("Banjul", 18, 35),
    ("Brazzaville", 18, 32),
    ("Cairo", 8, 38),
    ("Casablanca", 8, 32),
    ("Dakar", 18, 35),
    ("Dar es Salaam", 18, 32),
    ("Djibouti", 22, 42),
    ("Durban", 8, 32),
    ("Freetown", 20, 32),
    ("Gaborone", 5, 35),
    ("Harare", 5, 32),
    ("Johannesburg", 2, 30),
    ("Kampala", 15, 30),
    ("Khartoum", 15, 42),
    ("Kigali", 12, 28),
    ("Kinshasa", 18, 32),
    ("Lagos", 20, 35),
    ("Luanda", 18, 32),
    ("Lusaka", 8, 32),
    ("Maputo", 12, 32),
    ("Marrakech", 5, 42),
    ("Mogadishu", 20, 35),
    ("Mombasa", 20, 32),
    ("Monrovia", 20, 32),
    ("Nairobi", 8, 28),
    ("Niamey", 18, 42),
    ("Nouakchott", 15, 38),
    ("Ouagadougou", 18, 40),
    ("Port Louis", 15, 30),
    ("Rabat", 8, 32),
    ("Sfax", 8, 38),
    ("Tunis", 8, 38),
    ("Windhoek", 2, 35),
    ("Yaoundé", 18, 32),
    ("Zanzibar", 20, 32),
    ("Abu Dhabi", 15, 45),
    ("Ahmedabad", 12, 42),
    ("Almaty", -25, 35),
    ("Amman", 5, 38),
    ("Ankara", -5, 35),
    ("Ashgabat", -10, 42),
    ("Astana", -35, 35),
    ("Baku", -5, 38),
    ("Bangkok", 18, 38),
    ("Beijing", -15, 35),
    ("Beirut", 8, 35),
    ("Bishkek", -20, 35),
    ("Busan", -8, 32),
    ("Chengdu", 2, 35),
    ("Chongqing", 2, 38),
    ("Colombo", 20, 32),
    ("Dacca", 15, 38),
    ("Damascus", 2, 38),
    ("Delhi", 8, 45),
    ("Dhaka", 15, 38),
    ("Dushanbe", -15, 38),
    ("Fukuoka", -2, 35),
    ("Guangzhou", 8, 38),
    ("Hanoi", 12, 38),
    ("Harbin", -30, 30),
    ("Ho Chi Minh City", 18, 38),
    ("Hong Kong", 8, 35),
    ("Hyderabad", 15, 42),
    ("Islamabad", 2, 42),
    ("Istanbul", -5, 35),
    ("Jakarta", 20, 35),
    ("Karachi", 12, 42),
    ("Kathmandu", -5, 30),
    ("Kolkata", 12, 42),
    ("Kuala Lumpur", 20, 35),
    ("Kuwait City", 8, 48),
    ("Kyoto", -5, 35),
    ("Lahore", 8, 45),
    ("Manila", 20, 35),
    ("Mumbai", 18, 38),
    ("Nagoya", -5, 35),
    ("Nanjing", -5, 38),
    ("New Delhi", 8, 45),
    ("Osaka", -5, 35),
    ("Phnom Penh", 18, 38),
    ("Pune", 15, 38),
    ("Pyongyang", -15, 32),
    ("Qingdao", -8, 32),
    ("Riyadh", 8, 48),
    ("Sapporo", -15, 28),
    ("Seoul", -12, 32),
    ("Shanghai", -5, 38),
    ("Shenzhen", 8, 35),
    ("Singapore", 22, 32),
    ("Srinagar", -8, 32),
    ("Surabaya", 20, 35),
    ("Taipei", 8, 35),
    ("Tashkent", -10, 38),
    ("Tehran", -5, 40),
    ("Tel Aviv", 8, 35),
    ("Tianjin", -10, 35),
    ("Tokyo", -5, 35),
    ("Ulaanbaatar", -35, 30),
    ("Vientiane", 15, 38),
    ("Vladivostok", -20, 28),
    ("Wuhan", -2, 38),
    ("Xi'an", -8, 38),
    ("Yangon", 15, 38),
    ("Yekaterinburg", -25, 30),
    ("Yerevan", -10, 35),
    ("Zhengzhou", -5, 38),
    ("Amsterdam", -5, 28),
    ("Athens", 2, 38),
    ("Barcelona", 2, 35),
    ("Belgrade", -8, 35),
    ("Berlin", -10, 32),
    ("Birmingham", -8, 28),
    ("Bratislava", -10, 32),
    ("Brussels", -8, 28),
    ("Bucharest", -12, 35),
    ("Budapest", -10, 32),
    ("Copenhagen", -12, 25),
    ("Dublin", -5, 25),
    ("Edinburgh", -8, 22),
    ("Frankfurt", -10, 32),
    ("Glasgow", -8, 22),
    ("Hamburg", -10, 28),
    ("Helsinki", -20, 25),
    ("Kiev", -15, 30),
    ("Krakow", -12, 30),
    ("Lisbon", 2, 32),
    ("London", -5, 28),
    ("Madrid", -5, 38),
    ("Manchester", -8, 25),
    ("Marseille", 2, 35),
    ("Milan", -5, 35),
    ("Moscow", -25, 30),
    ("Munich", -12, 30),
    ("Naples", 2, 35),
    ("Oslo", -15, 25),
    ("Paris", -5, 32),
    ("Prague", -12, 30),
    ("Riga", -20, 25),
    ("Rome", 2, 35),
    ("Rotterdam", -8, 28),
    ("Saint Petersburg", -20, 25),
    ("Sofia", -12, 32),
    ("Stockholm", -15, 25),
    ("Strasbourg", -8, 30),
    ("Tallinn", -20, 25),
    ("Thessaloniki", 2, 35),
    ("Tirana", -5, 35),
    ("Vienna", -10, 30),
    ("Vilnius", -20, 25),
    ("Warsaw", -15, 30),
    ("Wroclaw", -12, 30),
    ("Zagreb", -8, 32),
    ("Zurich", -8, 30),
    ("Albuquerque", -8, 38),
    ("Anchorage", -25, 22),
    ("Atlanta", -5, 35),
    ("Austin", 2, 40),
    ("Baltimore", -8, 35),
    ("Boston", -12, 32),
    ("Calgary", -25, 25),
    ("Charlotte", -5, 35),
    ("Chicago", -15, 32),
    ("Cincinnati", -10, 32),
    ("Cleveland", -12, 30),
    ("Columbus", -10, 32),
    ("Dallas", 2, 40),
    ("Denver", -15, 35),
    ("Detroit", -15, 32),
    ("Edmonton", -25, 25),
    ("Fort Worth", 2, 40),
    ("Fresno", 2, 42),
    ("Houston", 5, 38),
    ("Indianapolis", -10, 32),
    ("Jacksonville", 2, 35),
    ("Kansas City", -12, 35),
    ("Las Vegas", 2, 45),
    ("Long Beach", 8, 32),
    ("Los Angeles", 8, 32),
    ("Louisville", -8, 35),
    ("Memphis", -5, 38),
    ("Mesa", 2, 45),
    ("Miami", 8, 35),
    ("Milwaukee", -15, 30),
    ("Minneapolis", -20, 30),
    ("Montreal", -20, 28),
    ("Nashville", -8, 35),
    ("New Orleans", 2, 38),
    ("New York", -8, 35),
    ("Oakland", 8, 28),
    ("Oklahoma City", -8, 38),
    ("Omaha", -15, 32),
    ("Orlando", 5, 35),
    ("Philadelphia", -8, 35),
    ("Phoenix", 2, 45),
    ("Pittsburgh", -10, 30),
    ("Portland", -2, 32),
    ("Quebec", -20, 25),
    ("Raleigh", -5, 35),
    ("Sacramento", 2, 40),
    ("San Antonio", 2, 40),
    ("San Diego", 8, 30),
    ("San Francisco", 8, 25),
    ("San Jose", 5, 32),
    ("Seattle", -2, 28),
    ("St. Louis", -10, 35),
    ("Tampa", 5, 35),
    ("Toronto", -15, 30),
    ("Tucson", 2, 42),
    ("Vancouver", -5, 25),
    ("Virginia Beach", -2, 35),
    ("Washington", -8, 35),
    ("Winnipeg", -25, 25),
    ("Asuncion", 5, 38),
    ("Belo Horizonte", 8, 32),
    ("Bogota", 8, 25),
    ("Brasilia", 8, 32),
    ("Buenos Aires", -2, 35),
    ("Caracas", 15, 32),
    ("Cordoba", -2, 35),
    ("Curitiba", 5, 30),
    ("Fortaleza", 20, 32),
    ("Guayaquil", 18, 32),
    ("Lima", 12, 28),
    ("Manaus", 20, 35),
    ("Medellin", 12, 28),
    ("Montevideo", 2, 30),
    ("Porto Alegre", 5, 32),
    ("Quito", 8, 22),
    ("Recife", 20, 32),
    ("Rio de Janeiro", 15, 35),
    ("Salvador", 18, 32),
    ("Santiago", -2, 32),
    ("Sao Paulo", 8, 32),
    ("Valencia", 18, 35),
    ("Adelaide", 5, 35),
    ("Auckland", 5, 25),
    ("Brisbane", 8, 32),
    ("Canberra", -2, 32),
    ("Christchurch", 2, 25),
    ("Darwin", 15, 35),
    ("Gold Coast", 8, 32),
    ("Hobart", 2, 25),
    ("Melbourne", 5, 30),
    ("Newcastle", 8, 30),
    ("Perth", 8, 35),
    ("Sydney", 5, 30),
    ("Wellington", 5, 22),
];
